//! Error types for CSG construction.

use thiserror::Error;

/// Result type alias for CSG operations.
pub type CsgResult<T> = Result<T, CsgError>;

/// Errors that can occur while building geometry for CSG operations.
///
/// Boolean operators themselves never fail: every error is reported when
/// the offending face, plane or option is constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsgError {
    /// A face was built from a vertex count other than three.
    #[error("a face needs exactly 3 vertices, got {vertex_count}")]
    MalformedFace { vertex_count: usize },

    /// A plane normal has zero length (collinear points or a zero vector).
    #[error("cannot build a plane from a zero-length normal")]
    DegeneratePlane,

    /// The classification tolerance is not finite or is below the minimum.
    #[error("tolerance must be finite and at least f32::EPSILON, got {value}")]
    InvalidTolerance { value: f32 },

    /// A flat vertex list cannot be grouped into triangles.
    #[error("vertex list of length {vertex_count} is not a multiple of 3")]
    NonTriangulated { vertex_count: usize },
}
