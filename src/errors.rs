//! Errors reported by the SDF engine

/// Result alias used by fallible engine operations.
pub type SdfResult<T> = Result<T, SdfError>;

/// All the ways a construction, update or sampling call can fail.
///
/// Per-point degeneracies (zero-area faces, coincident vertices) never show up
/// here; they are resolved locally with fallback values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdfError {
    /// (FaceIndexOutOfRange) A face references a vertex that does not exist
    #[error(
        "(FaceIndexOutOfRange) Face {face} references vertex {index}, but only {vertex_count} vertices exist"
    )]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    /// (ZeroSurfaceArea) Surface sampling needs a mesh with positive total area
    #[error("(ZeroSurfaceArea) Cannot sample the surface of a mesh with zero total area")]
    ZeroSurfaceArea,

    /// (ViewNotResizable) A borrowed buffer cannot change length
    #[error(
        "(ViewNotResizable) The {buffer} buffer is a view of {expected} elements and cannot be replaced by {actual}"
    )]
    ViewNotResizable {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },
}
