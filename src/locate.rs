//! Point location by exhaustive scan of the mesh.

use crate::error::{Error, Result};
use crate::geometry::{Containment, Point, Scalar};
use crate::mesh::{Adjacent, EdgeId, Mesh, TriangleId};

/// Where a new point falls in the current mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// strictly inside one triangle
    Interior(TriangleId),
    /// on a hull edge bordering a single triangle
    HullEdge(EdgeId, TriangleId),
    /// on an interior edge shared by two triangles
    InteriorEdge(EdgeId, TriangleId, TriangleId),
}

/// Classifies `p` against every triangle of `mesh`, falling back to an edge scan
/// when no triangle contains it strictly.
pub fn locate<T: Scalar>(mesh: &Mesh<T>, p: &Point<T>) -> Result<Location> {
    let distance = mesh.tolerance().distance;
    let mut inside = None;
    let mut inside_count = 0;
    let mut touching = false;
    for (t, triangle) in mesh.triangles() {
        match triangle.classify(p, distance) {
            Containment::Inside => {
                if inside.is_none() {
                    inside = Some(t);
                }
                inside_count += 1;
            }
            Containment::OnBoundary => touching = true,
            Containment::Outside => {}
        }
    }
    match (inside, inside_count) {
        (Some(t), 1) => return Ok(Location::Interior(t)),
        (Some(_), n) => {
            return Err(Error::AmbiguousLocation {
                point: p.to_f64(),
                triangles: n,
                edges: 0,
            })
        }
        _ => {}
    }

    if touching && mesh.points().iter().any(|v| v.distance(p) <= distance) {
        return Err(Error::DuplicatePoint { point: p.to_f64() });
    }

    let mut on = mesh.edges().filter(|(_, e)| e.contains(p, distance));
    let first = on.next();
    let rest = on.count();
    let Some((e, _)) = first else {
        tracing::warn!(point = ?p.to_f64(), "point is outside the mesh");
        return Err(Error::Location { point: p.to_f64() });
    };
    if rest > 0 {
        return Err(Error::AmbiguousLocation {
            point: p.to_f64(),
            triangles: 0,
            edges: rest + 1,
        });
    }

    match mesh.adjacent(e) {
        Adjacent::One(t) => Ok(Location::HullEdge(e, t)),
        Adjacent::Two(t1, t2) => Ok(Location::InteriorEdge(e, t1, t2)),
        Adjacent::None => Err(Error::Topology("edge borders no triangle")),
    }
}
