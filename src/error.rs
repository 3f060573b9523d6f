//! Error type shared by every construction step.

use thiserror::Error;

/// Errors raised while building a triangulation.
///
/// Every variant aborts the insertion step in progress. Errors found while
/// locating or splitting leave the mesh as it was; [`Error::FlipDivergence`] and
/// a [`Error::DegenerateTriangle`] raised by a flip leave the new vertex in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("degenerate triangle {vertices:?}: area {area} is below tolerance")]
    DegenerateTriangle { vertices: [[f64; 2]; 3], area: f64 },

    #[error("degenerate edge {vertices:?}: zero length")]
    DegenerateEdge { vertices: [[f64; 2]; 2] },

    #[error("point {point:?} lies in no triangle and on no edge of the mesh")]
    Location { point: [f64; 2] },

    #[error("point {point:?} is ambiguous: inside {triangles} triangles, on {edges} edges")]
    AmbiguousLocation {
        point: [f64; 2],
        triangles: usize,
        edges: usize,
    },

    #[error("point {point:?} coincides with an existing vertex")]
    DuplicatePoint { point: [f64; 2] },

    #[error("edge flipping did not converge after {flips} flips while inserting {point:?}")]
    FlipDivergence { point: [f64; 2], flips: usize },

    #[error("no input points")]
    EmptyInput,

    #[error("mesh invariant violated: {0}")]
    Topology(&'static str),
}

impl Error {
    /// Whether this error stems from degenerate (collinear or zero-length) input.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Error::DegenerateTriangle { .. } | Error::DegenerateEdge { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, Error>;
