//! Arena-backed triangle mesh with stable integer handles.
//!
//! Vertices are never removed. Edge and triangle slots are recycled once freed, so
//! a handle is only meaningful while the element it names is alive.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geometry::{Edge, Point, Rect, Scalar, Tolerance, Triangle};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i <= u32::MAX as usize);
                Self(i as u32)
            }
        }
    };
}

handle!(
    /// Index of a vertex in insertion order.
    VertexId
);
handle!(EdgeId);
handle!(TriangleId);

#[derive(Clone, Debug)]
struct EdgeSlot {
    /// endpoints in canonical (coordinate) order
    v: [VertexId; 2],
    /// bordering triangles, filled from the front
    tris: [Option<TriangleId>; 2],
}

#[derive(Clone, Debug)]
struct TriangleSlot {
    /// vertices in canonical (coordinate) order
    v: [VertexId; 3],
    /// edges AB, BC, AC
    edges: [EdgeId; 3],
}

/// Triangles bordering an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjacent {
    None,
    One(TriangleId),
    Two(TriangleId, TriangleId),
}

impl Adjacent {
    pub fn len(&self) -> usize {
        match self {
            Adjacent::None => 0,
            Adjacent::One(_) => 1,
            Adjacent::Two(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Adjacent::None)
    }
}

#[derive(Clone, Debug)]
pub struct Mesh<T> {
    tolerance: Tolerance<T>,
    points: Vec<Point<T>>,
    edges: Vec<Option<EdgeSlot>>,
    free_edges: Vec<EdgeId>,
    triangles: Vec<Option<TriangleSlot>>,
    free_triangles: Vec<TriangleId>,
    edge_index: HashMap<(VertexId, VertexId), EdgeId>,
    live_edges: usize,
    live_triangles: usize,
}

#[inline]
fn key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<T: Scalar> Mesh<T> {
    /// Creates an empty mesh that admits triangles and locates points with
    /// `tolerance`.
    pub fn new(tolerance: Tolerance<T>) -> Self {
        Self {
            tolerance,
            points: Vec::new(),
            edges: Vec::new(),
            free_edges: Vec::new(),
            triangles: Vec::new(),
            free_triangles: Vec::new(),
            edge_index: HashMap::new(),
            live_edges: 0,
            live_triangles: 0,
        }
    }

    /// Seeds a mesh with the corners of `bounds` split along the
    /// (min, min)-(max, max) diagonal.
    pub fn bootstrap(bounds: &Rect<T>, tolerance: Tolerance<T>) -> Result<Self> {
        let [p1, p2, p3, p4] = bounds.corners();
        Triangle::new(p1, p2, p3, tolerance.area)?;
        Triangle::new(p1, p3, p4, tolerance.area)?;

        let mut mesh = Self::new(tolerance);
        let [v1, v2, v3, v4] = [p1, p2, p3, p4].map(|p| mesh.add_vertex(p));
        mesh.add_triangle(v1, v2, v3)?;
        mesh.add_triangle(v1, v3, v4)?;
        Ok(mesh)
    }

    pub fn tolerance(&self) -> Tolerance<T> {
        self.tolerance
    }

    pub(crate) fn add_vertex(&mut self, p: Point<T>) -> VertexId {
        self.points.push(p);
        VertexId::from_index(self.points.len() - 1)
    }

    pub fn point(&self, v: VertexId) -> Point<T> {
        self.points[v.index()]
    }

    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn triangle_count(&self) -> usize {
        self.live_triangles
    }

    fn edge_slot(&self, e: EdgeId) -> Result<&EdgeSlot> {
        self.edges
            .get(e.index())
            .and_then(Option::as_ref)
            .ok_or(Error::Topology("stale edge handle"))
    }

    fn edge_slot_mut(&mut self, e: EdgeId) -> Result<&mut EdgeSlot> {
        self.edges
            .get_mut(e.index())
            .and_then(Option::as_mut)
            .ok_or(Error::Topology("stale edge handle"))
    }

    fn triangle_slot(&self, t: TriangleId) -> Result<&TriangleSlot> {
        self.triangles
            .get(t.index())
            .and_then(Option::as_ref)
            .ok_or(Error::Topology("stale triangle handle"))
    }

    fn sort2(&self, a: VertexId, b: VertexId) -> [VertexId; 2] {
        let mut v = [a, b];
        v.sort_unstable_by(|&p, &q| self.point(p).lex_cmp(&self.point(q)));
        v
    }

    fn sort3(&self, a: VertexId, b: VertexId, c: VertexId) -> [VertexId; 3] {
        let mut v = [a, b, c];
        v.sort_unstable_by(|&p, &q| self.point(p).lex_cmp(&self.point(q)));
        v
    }

    /// Returns the edge between `a` and `b`, creating it if needed.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId> {
        if let Some(e) = self.edge_between(a, b) {
            return Ok(e);
        }
        Edge::new(self.point(a), self.point(b))?;
        let slot = EdgeSlot {
            v: self.sort2(a, b),
            tris: [None, None],
        };
        let e = match self.free_edges.pop() {
            Some(e) => {
                self.edges[e.index()] = Some(slot);
                e
            }
            None => {
                self.edges.push(Some(slot));
                EdgeId::from_index(self.edges.len() - 1)
            }
        };
        self.edge_index.insert(key(a, b), e);
        self.live_edges += 1;
        Ok(e)
    }

    /// Removes an edge that no triangle references any more.
    pub fn remove_edge(&mut self, e: EdgeId) -> Result<()> {
        let slot = self.edge_slot(e)?;
        if slot.tris.iter().any(Option::is_some) {
            return Err(Error::Topology("removing an edge still bordering a triangle"));
        }
        let [a, b] = slot.v;
        self.edge_index.remove(&key(a, b));
        self.edges[e.index()] = None;
        self.free_edges.push(e);
        self.live_edges -= 1;
        Ok(())
    }

    /// Adds the triangle (a, b, c), creating any of its edges that are missing.
    ///
    /// Nothing is mutated when the triangle is degenerate or one of its edges
    /// already borders two triangles.
    pub fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) -> Result<TriangleId> {
        Triangle::new(self.point(a), self.point(b), self.point(c), self.tolerance.area)?;
        let v = self.sort3(a, b, c);
        let pairs = [(v[0], v[1]), (v[1], v[2]), (v[0], v[2])];
        for &(p, q) in &pairs {
            if let Some(e) = self.edge_between(p, q) {
                if self.edge_slot(e)?.tris[1].is_some() {
                    return Err(Error::Topology("edge would border more than two triangles"));
                }
            }
        }

        let mut edges = [EdgeId(0); 3];
        for (slot, &(p, q)) in edges.iter_mut().zip(&pairs) {
            *slot = self.add_edge(p, q)?;
        }
        let t = match self.free_triangles.pop() {
            Some(t) => t,
            None => {
                self.triangles.push(None);
                TriangleId::from_index(self.triangles.len() - 1)
            }
        };
        self.triangles[t.index()] = Some(TriangleSlot { v, edges });
        for e in edges {
            let tris = &mut self.edge_slot_mut(e)?.tris;
            if tris[0].is_none() {
                tris[0] = Some(t);
            } else {
                tris[1] = Some(t);
            }
        }
        self.live_triangles += 1;
        Ok(t)
    }

    /// Removes a triangle and detaches it from its edges.
    ///
    /// The edges stay in the mesh; callers either reuse them or remove them.
    pub fn remove_triangle(&mut self, t: TriangleId) -> Result<[VertexId; 3]> {
        let TriangleSlot { v, edges } = self.triangle_slot(t)?.clone();
        for e in edges {
            let tris = &mut self.edge_slot_mut(e)?.tris;
            if tris[0] == Some(t) {
                *tris = [tris[1], None];
            } else if tris[1] == Some(t) {
                tris[1] = None;
            } else {
                return Err(Error::Topology("triangle missing from its edge"));
            }
        }
        self.triangles[t.index()] = None;
        self.free_triangles.push(t);
        self.live_triangles -= 1;
        Ok(v)
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&key(a, b)).copied()
    }

    /// Triangles currently bordering `e`; a stale handle has none.
    pub fn adjacent(&self, e: EdgeId) -> Adjacent {
        match self.edge_slot(e).map(|s| s.tris) {
            Ok([Some(t1), Some(t2)]) => Adjacent::Two(t1, t2),
            Ok([Some(t), None]) | Ok([None, Some(t)]) => Adjacent::One(t),
            _ => Adjacent::None,
        }
    }

    /// The triangle across `e` from `t`, or `None` on the hull.
    pub fn neighbor(&self, t: TriangleId, e: EdgeId) -> Option<TriangleId> {
        match self.adjacent(e) {
            Adjacent::Two(t1, t2) if t1 == t => Some(t2),
            Adjacent::Two(t1, t2) if t2 == t => Some(t1),
            _ => None,
        }
    }

    /// The vertex of `t` that is not an endpoint of `e`.
    pub fn opposite(&self, t: TriangleId, e: EdgeId) -> Result<VertexId> {
        let [a, b] = self.edge_slot(e)?.v;
        self.triangle_slot(t)?
            .v
            .into_iter()
            .find(|&v| v != a && v != b)
            .ok_or(Error::Topology("edge does not belong to triangle"))
    }

    pub fn edge_vertices(&self, e: EdgeId) -> Option<[VertexId; 2]> {
        self.edge_slot(e).ok().map(|s| s.v)
    }

    pub fn triangle_vertices(&self, t: TriangleId) -> Option<[VertexId; 3]> {
        self.triangle_slot(t).ok().map(|s| s.v)
    }

    pub fn triangle_edges(&self, t: TriangleId) -> Option<[EdgeId; 3]> {
        self.triangle_slot(t).ok().map(|s| s.edges)
    }

    pub fn edge(&self, e: EdgeId) -> Option<Edge<T>> {
        let [a, b] = self.edge_vertices(e)?;
        Some(Edge::from_sorted(self.point(a), self.point(b)))
    }

    pub fn triangle(&self, t: TriangleId) -> Option<Triangle<T>> {
        let [a, b, c] = self.triangle_vertices(t)?;
        Some(Triangle::from_sorted(
            self.point(a),
            self.point(b),
            self.point(c),
        ))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| EdgeId::from_index(i))
    }

    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| TriangleId::from_index(i))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, Edge<T>)> + '_ {
        self.edge_ids().filter_map(|e| Some((e, self.edge(e)?)))
    }

    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, Triangle<T>)> + '_ {
        self.triangle_ids()
            .filter_map(|t| Some((t, self.triangle(t)?)))
    }

    /// Checks that every triangle's edges exist and reference it back, and that
    /// every edge borders one or two triangles.
    pub fn validate(&self) -> Result<()> {
        for t in self.triangle_ids() {
            let slot = self.triangle_slot(t)?;
            let [a, b, c] = slot.v;
            if self.sort3(a, b, c) != slot.v {
                return Err(Error::Topology("triangle vertices out of canonical order"));
            }
            Triangle::new(self.point(a), self.point(b), self.point(c), self.tolerance.area)?;
            for (e, (p, q)) in slot.edges.into_iter().zip([(a, b), (b, c), (a, c)]) {
                if self.edge_between(p, q) != Some(e) {
                    return Err(Error::Topology("triangle edge missing from edge set"));
                }
                if !self.edge_slot(e)?.tris.contains(&Some(t)) {
                    return Err(Error::Topology("edge does not reference its triangle"));
                }
            }
        }
        for e in self.edge_ids() {
            let slot = self.edge_slot(e)?;
            if self.adjacent(e).is_empty() {
                return Err(Error::Topology("edge borders no triangle"));
            }
            for t in slot.tris.into_iter().flatten() {
                if !self.triangle_slot(t)?.edges.contains(&e) {
                    return Err(Error::Topology("edge references a foreign triangle"));
                }
            }
        }
        if self.edge_index.len() != self.live_edges {
            return Err(Error::Topology("edge index out of sync"));
        }
        Ok(())
    }
}
