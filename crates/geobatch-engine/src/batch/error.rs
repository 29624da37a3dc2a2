use thiserror::Error;

use super::sort::SortMode;

/// Misuse of the batch API by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    #[error("begin called while a batch is already open")]
    AlreadyOpen,

    #[error("{operation} called without an open batch")]
    NotOpen { operation: &'static str },

    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("font has no glyph for {0:?} and no default character")]
    UnknownGlyph(char),

    #[error("texture has zero width or height")]
    EmptyTexture,
}

/// Per-polygon triangulation failure. Never aborts a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("tessellator produced {produced} vertices for a {expected}-vertex contour")]
    VertexCountMismatch { expected: usize, produced: usize },

    #[error("tessellator vertex ({x}, {y}) matches no input vertex")]
    UnresolvedVertex { x: f32, y: f32 },

    #[error("tessellation failed: {0}")]
    Tessellation(String),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("sort mode {0:?} is not supported")]
    UnsupportedMode(SortMode),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(
        "polygon with {vertices} vertices / {indices} indices exceeds scratch capacity \
         ({max_vertices} vertices / {max_indices} indices)"
    )]
    PolygonTooLarge {
        vertices: usize,
        indices: usize,
        max_vertices: usize,
        max_indices: usize,
    },

    #[error("{0} has been disposed")]
    Disposed(&'static str),

    #[error("invalid batch configuration: {0}")]
    Config(String),

    #[error("failed to start tessellation workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),

    #[error("font error: {0}")]
    Font(String),
}
