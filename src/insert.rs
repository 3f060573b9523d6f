//! Splicing a located point into the mesh.

use crate::error::Result;
use crate::geometry::{Point, Scalar, Triangle};
use crate::locate::Location;
use crate::mesh::{EdgeId, Mesh, TriangleId, VertexId};

/// Which of the insertion cases a point went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertionCase {
    Interior,
    HullEdge,
    InteriorEdge,
}

/// The outcome of splicing a point into the mesh.
#[derive(Clone, Debug)]
pub struct Insertion {
    pub vertex: VertexId,
    pub case: InsertionCase,
    /// the new triangles fanned around `vertex`
    pub triangles: Vec<TriangleId>,
    /// edges facing `vertex` in the new fan; these are the only ones that may
    /// have become illegal
    pub suspects: Vec<[VertexId; 2]>,
}

/// Removes the triangles at `location` and fans `p` around the hole they leave.
///
/// Every new triangle is checked before the mesh is touched, so a degenerate fan
/// leaves the mesh unchanged.
pub fn split<T: Scalar>(mesh: &mut Mesh<T>, p: Point<T>, location: Location) -> Result<Insertion> {
    let (case, removed, shared, rim) = plan(mesh, location)?;

    let min_area = mesh.tolerance().area;
    for &[a, b] in &rim {
        Triangle::new(p, mesh.point(a), mesh.point(b), min_area)?;
    }

    let vertex = mesh.add_vertex(p);
    for t in removed {
        mesh.remove_triangle(t)?;
    }
    if let Some(e) = shared {
        mesh.remove_edge(e)?;
    }
    let triangles = rim
        .iter()
        .map(|&[a, b]| mesh.add_triangle(vertex, a, b))
        .collect::<Result<Vec<_>>>()?;

    Ok(Insertion {
        vertex,
        case,
        triangles,
        suspects: rim,
    })
}

type Plan = (InsertionCase, Vec<TriangleId>, Option<EdgeId>, Vec<[VertexId; 2]>);

/// Works out which triangles go, which edge goes with them, and the rim the new
/// point is fanned around.
fn plan<T: Scalar>(mesh: &Mesh<T>, location: Location) -> Result<Plan> {
    let missing = crate::error::Error::Topology("located element vanished");
    match location {
        Location::Interior(t) => {
            let [a, b, c] = mesh.triangle_vertices(t).ok_or(missing)?;
            Ok((
                InsertionCase::Interior,
                vec![t],
                None,
                vec![[a, b], [b, c], [c, a]],
            ))
        }
        Location::HullEdge(e, t) => {
            let [x, y] = mesh.edge_vertices(e).ok_or(missing)?;
            let u = mesh.opposite(t, e)?;
            Ok((
                InsertionCase::HullEdge,
                vec![t],
                Some(e),
                vec![[x, u], [y, u]],
            ))
        }
        Location::InteriorEdge(e, t1, t2) => {
            let [x, y] = mesh.edge_vertices(e).ok_or(missing)?;
            let u1 = mesh.opposite(t1, e)?;
            let u2 = mesh.opposite(t2, e)?;
            Ok((
                InsertionCase::InteriorEdge,
                vec![t1, t2],
                Some(e),
                vec![[x, u1], [u1, y], [y, u2], [u2, x]],
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Tolerance};
    use crate::locate::locate;

    fn mesh() -> Mesh<f64> {
        let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        Mesh::bootstrap(&bounds, Tolerance::uniform(1e-9)).unwrap()
    }

    fn insert(mesh: &mut Mesh<f64>, x: f64, y: f64) -> Insertion {
        let p = Point::new(x, y);
        let loc = locate(mesh, &p).unwrap();
        split(mesh, p, loc).unwrap()
    }

    #[test]
    fn interior_fan() {
        let mut mesh = mesh();
        let ins = insert(&mut mesh, 3.0, 0.5);
        assert_eq!(ins.case, InsertionCase::Interior);
        assert_eq!(ins.triangles.len(), 3);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.edge_count(), 8);
        mesh.validate().unwrap();
    }

    #[test]
    fn hull_edge_fan() {
        let mut mesh = mesh();
        let ins = insert(&mut mesh, 2.0, 0.0);
        assert_eq!(ins.case, InsertionCase::HullEdge);
        assert_eq!(ins.triangles.len(), 2);
        assert_eq!(mesh.triangle_count(), 3);
        // the split hull edge is gone
        let (a, b) = (VertexId::from_index(0), VertexId::from_index(3));
        assert!(mesh.edge_between(a, b).is_none());
        mesh.validate().unwrap();
    }

    #[test]
    fn interior_edge_fan() {
        let mut mesh = mesh();
        let ins = insert(&mut mesh, 2.0, 1.0);
        assert_eq!(ins.case, InsertionCase::InteriorEdge);
        assert_eq!(ins.triangles.len(), 4);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.edge_count(), 8);
        // the rim is the bounding quadrilateral
        for [a, b] in &ins.suspects {
            let e = mesh.edge_between(*a, *b).unwrap();
            assert_eq!(mesh.adjacent(e).len(), 1);
        }
        mesh.validate().unwrap();
    }

    #[test]
    fn degenerate_fan_is_rejected_before_mutation() {
        let mut mesh = mesh();
        // a point on the bottom hull edge, wrongly presented as interior
        let p = Point::new(2.0, 0.0);
        let lower = mesh
            .triangles()
            .find(|(_, t)| t.has_vertex(&Point::new(4.0, 0.0)))
            .map(|(t, _)| t)
            .unwrap();
        let before = (mesh.vertex_count(), mesh.triangle_count(), mesh.edge_count());
        let err = split(&mut mesh, p, Location::Interior(lower)).unwrap_err();
        assert!(err.is_degenerate());
        assert_eq!(
            before,
            (mesh.vertex_count(), mesh.triangle_count(), mesh.edge_count())
        );
        mesh.validate().unwrap();
    }
}
