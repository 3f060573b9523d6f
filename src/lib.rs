//! Incremental planar Delaunay triangulation.
//!
//! Points are inserted one at a time into a mesh seeded from a bounding rectangle.
//! Each insertion locates the point, fans it into the triangle (or the pair of
//! triangles) it falls in, and flips any edge the new fan made illegal.

pub mod config;
pub mod error;
pub mod geometry;
pub mod insert;
pub mod legalize;
pub mod locate;
pub mod mesh;

pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{
    convex_hull, polygon_area, Containment, Edge, Point, Rect, Scalar, Tolerance, Triangle,
};
pub use insert::InsertionCase;
pub use mesh::{Adjacent, EdgeId, Mesh, TriangleId, VertexId};

/// Counters collected while building a triangulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// points inserted, excluding the bounding corners
    pub inserted: usize,
    pub interior: usize,
    pub hull_edge: usize,
    pub interior_edge: usize,
    pub flips: usize,
}

/// A Delaunay triangulation under construction.
///
/// Location errors, duplicates and a degenerate fan are all detected before the
/// mesh changes, so they leave it as it was before the failing insertion. A flip
/// divergence, or a degenerate triangle produced by a flip, happens after the
/// point is spliced in; the mesh is then still a valid triangulation holding the
/// new vertex, but may not be Delaunay around it.
#[derive(Clone, Debug)]
pub struct Triangulation<T: Scalar> {
    mesh: Mesh<T>,
    bounds: Rect<T>,
    config: Config<T>,
    stats: Stats,
}

impl<T: Scalar> Triangulation<T> {
    /// Seeds a triangulation with the corners of `bounds`.
    pub fn new(bounds: Rect<T>) -> Result<Self> {
        Self::with_config(bounds, Config::default())
    }

    /// Seeds a triangulation whose tolerances are `config.epsilon` scaled to the
    /// size of `bounds`.
    pub fn with_config(bounds: Rect<T>, config: Config<T>) -> Result<Self> {
        let tolerance = Tolerance::scaled(config.epsilon, &bounds);
        let mesh = Mesh::bootstrap(&bounds, tolerance)?;
        Ok(Self {
            mesh,
            bounds,
            config,
            stats: Stats::default(),
        })
    }

    /// Inserts a single point and restores the Delaunay property around it.
    ///
    /// A point equal to one of the bounding corners is already present and returns
    /// that corner's vertex.
    pub fn insert(&mut self, p: impl Into<Point<T>>) -> Result<VertexId> {
        let p = p.into();
        if let Some(i) = self.bounds.corners().iter().position(|c| *c == p) {
            return Ok(VertexId::from_index(i));
        }
        if !self.bounds.contains(&p) {
            tracing::warn!(point = ?p.to_f64(), "point is outside the bounds");
            return Err(Error::Location { point: p.to_f64() });
        }

        let location = locate::locate(&self.mesh, &p)?;
        let insertion = insert::split(&mut self.mesh, p, location)?;
        let flips = legalize::legalize(
            &mut self.mesh,
            &insertion.suspects,
            Some(insertion.vertex),
            self.config.max_flips_per_insertion,
        )?;

        self.stats.inserted += 1;
        self.stats.flips += flips;
        match insertion.case {
            InsertionCase::Interior => self.stats.interior += 1,
            InsertionCase::HullEdge => self.stats.hull_edge += 1,
            InsertionCase::InteriorEdge => self.stats.interior_edge += 1,
        }
        tracing::debug!(
            vertex = insertion.vertex.index(),
            case = ?insertion.case,
            flips,
            "inserted point"
        );
        Ok(insertion.vertex)
    }

    /// Inserts every point in order, stopping at the first failure.
    pub fn insert_all<P: Into<Point<T>>>(
        &mut self,
        points: impl IntoIterator<Item = P>,
    ) -> Result<()> {
        for p in points {
            self.insert(p)?;
        }
        Ok(())
    }

    /// Checks every edge of the mesh and flips until all are legal.
    ///
    /// Returns the number of flips, which is zero for a mesh already built by
    /// [`Triangulation::insert`].
    pub fn legalize_all(&mut self) -> Result<usize> {
        let edges: Vec<[VertexId; 2]> = self
            .mesh
            .edge_ids()
            .filter_map(|e| self.mesh.edge_vertices(e))
            .collect();
        let budget = self
            .config
            .max_flips_per_insertion
            .saturating_mul(self.mesh.vertex_count().max(1));
        let flips = legalize::legalize(&mut self.mesh, &edges, None, budget)?;
        self.stats.flips += flips;
        Ok(flips)
    }

    /// Whether every interior edge passes the in-circle test.
    pub fn is_delaunay(&self) -> Result<bool> {
        for e in self.mesh.edge_ids() {
            if legalize::check(&self.mesh, e)?.is_some() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn mesh(&self) -> &Mesh<T> {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh<T> {
        self.mesh
    }

    pub fn bounds(&self) -> &Rect<T> {
        &self.bounds
    }

    pub fn config(&self) -> &Config<T> {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// All vertices, the four bounding corners first.
    pub fn points(&self) -> &[Point<T>] {
        self.mesh.points()
    }

    /// Triangles as canonical vertex triples.
    pub fn triangles(&self) -> Vec<Triangle<T>> {
        self.mesh.triangles().map(|(_, t)| t).collect()
    }

    /// Triangles as indices into [`Triangulation::points`].
    pub fn triangle_indices(&self) -> Vec<[usize; 3]> {
        self.mesh
            .triangle_ids()
            .filter_map(|t| self.mesh.triangle_vertices(t))
            .map(|v| v.map(VertexId::index))
            .collect()
    }

    pub fn edges(&self) -> Vec<Edge<T>> {
        self.mesh.edges().map(|(_, e)| e).collect()
    }
}

/// Triangulates `points` inside their own bounding box.
///
/// The bounding corners become vertices of the result; input points equal to a
/// corner are not duplicated.
pub fn triangulate<T: Scalar>(points: &[Point<T>]) -> Result<Triangulation<T>> {
    triangulate_with_config(points, Config::default())
}

pub fn triangulate_with_config<T: Scalar>(
    points: &[Point<T>],
    config: Config<T>,
) -> Result<Triangulation<T>> {
    let bounds = Rect::bounding(points).ok_or(Error::EmptyInput)?;
    let mut triangulation = Triangulation::with_config(bounds, config)?;
    triangulation.insert_all(points.iter().copied())?;
    Ok(triangulation)
}

/// Returns the relative difference between the convex hull area of the points
/// and the total area of the triangles; used to verify that a triangulation
/// covers its hull exactly once. A degenerate hull yields the absolute triangle
/// area instead.
pub fn deviation<T: Scalar>(points: &[Point<T>], triangles: &[[usize; 3]]) -> T {
    let hull_area = polygon_area(&convex_hull(points));
    let two = T::one() + T::one();
    let mut triangles_area = T::zero();
    for &[a, b, c] in triangles {
        let (a, b, c) = (points[a], points[b], points[c]);
        triangles_area = triangles_area
            + ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() / two;
    }
    if hull_area == T::zero() {
        triangles_area
    } else {
        ((hull_area - triangles_area) / hull_area).abs()
    }
}
