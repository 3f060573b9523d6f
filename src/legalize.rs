//! Edge legalization by diagonal flips.

use crate::error::{Error, Result};
use crate::geometry::{Point, Scalar, Triangle};
use crate::mesh::{Adjacent, EdgeId, Mesh, TriangleId, VertexId};

/// An interior edge whose opposite vertex lies inside the neighbouring circumcircle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Illegal {
    pub edge: EdgeId,
    pub endpoints: [VertexId; 2],
    pub triangles: [TriangleId; 2],
    /// the vertices of each triangle off the edge
    pub wings: [VertexId; 2],
}

/// Tests `e` against its two bordering triangles; hull edges are always legal.
///
/// A single exact in-circle determinant decides; cocircular quadrilaterals count
/// as legal, so the existing diagonal is kept on ties.
pub fn check<T: Scalar>(mesh: &Mesh<T>, e: EdgeId) -> Result<Option<Illegal>> {
    let Adjacent::Two(t1, t2) = mesh.adjacent(e) else {
        return Ok(None);
    };
    let [x, y] = mesh
        .edge_vertices(e)
        .ok_or(Error::Topology("stale edge handle"))?;
    let u1 = mesh.opposite(t1, e)?;
    let u2 = mesh.opposite(t2, e)?;

    let (px, py, pu1, pu2) = (mesh.point(x), mesh.point(y), mesh.point(u1), mesh.point(u2));
    let (a, b) = if robust::orient2d(px.coord(), py.coord(), pu1.coord()) > 0.0 {
        (px, py)
    } else {
        (py, px)
    };
    let det = robust::incircle(a.coord(), b.coord(), pu1.coord(), pu2.coord());
    if det > 0.0 {
        Ok(Some(Illegal {
            edge: e,
            endpoints: [x, y],
            triangles: [t1, t2],
            wings: [u1, u2],
        }))
    } else {
        Ok(None)
    }
}

/// Replaces the diagonal of an illegal pair with the one joining its wings.
pub fn flip<T: Scalar>(mesh: &mut Mesh<T>, illegal: &Illegal) -> Result<[TriangleId; 2]> {
    let Illegal {
        edge,
        endpoints: [x, y],
        triangles: [t1, t2],
        wings: [u1, u2],
    } = *illegal;
    let min_area = mesh.tolerance().area;
    for v in [x, y] {
        Triangle::new(mesh.point(u1), mesh.point(u2), mesh.point(v), min_area)?;
    }

    mesh.remove_triangle(t1)?;
    mesh.remove_triangle(t2)?;
    mesh.remove_edge(edge)?;
    let n1 = mesh.add_triangle(u1, u2, x)?;
    let n2 = mesh.add_triangle(u1, u2, y)?;
    tracing::trace!(from = ?[x, y], to = ?[u1, u2], "flipped edge");
    Ok([n1, n2])
}

/// Legalizes `suspects` and whatever their flips expose, returning the flip count.
///
/// With an `apex` (the point just inserted) only edges facing away from it are
/// revisited after a flip, since edges touching it stay legal. Without one, all
/// four outer edges of every flipped pair are revisited.
pub fn legalize<T: Scalar>(
    mesh: &mut Mesh<T>,
    suspects: &[[VertexId; 2]],
    apex: Option<VertexId>,
    max_flips: usize,
) -> Result<usize> {
    let mut stack: Vec<[VertexId; 2]> = suspects.iter().rev().copied().collect();
    let mut flips = 0;
    while let Some([a, b]) = stack.pop() {
        // flips may already have replaced this edge
        let Some(e) = mesh.edge_between(a, b) else {
            continue;
        };
        let Some(illegal) = check(mesh, e)? else {
            continue;
        };
        if flips == max_flips {
            let point = match apex {
                Some(v) => mesh.point(v),
                None => midpoint(mesh.point(a), mesh.point(b)),
            };
            tracing::warn!(flips, point = ?point.to_f64(), "edge flipping diverged");
            return Err(Error::FlipDivergence {
                point: point.to_f64(),
                flips,
            });
        }
        flip(mesh, &illegal)?;
        flips += 1;

        let [x, y] = illegal.endpoints;
        let [u1, u2] = illegal.wings;
        match apex {
            Some(p) if p == u1 => stack.extend([[y, u2], [x, u2]]),
            Some(p) if p == u2 => stack.extend([[y, u1], [x, u1]]),
            _ => stack.extend([[y, u2], [x, u2], [y, u1], [x, u1]]),
        }
    }
    Ok(flips)
}

fn midpoint<T: Scalar>(a: Point<T>, b: Point<T>) -> Point<T> {
    let two = T::one() + T::one();
    Point::new((a.x + b.x) / two, (a.y + b.y) / two)
}
