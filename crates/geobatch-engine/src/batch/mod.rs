//! Textured geometry batching.
//!
//! Pipeline:
//! - shapes are built as [`Polygon`]s (quads directly, or via the sprite and
//!   text helpers on [`GeometryBatch`])
//! - `append` stores them in the submission buffer; outlines without indices
//!   go to the tessellation workers
//! - `end` sorts by key, packs into scratch buffers and issues draw calls on a
//!   [`GraphicsBackend`]

mod backend;
mod buffer;
mod config;
mod error;
mod flush;
mod polygon;
mod pool;
mod renderer;
mod scheduler;
mod sort;
mod sprite;
mod state;
mod tessellate;
mod texel;
mod text;

pub use backend::GraphicsBackend;
pub use buffer::{SlotRef, SubmissionBuffer};
pub use config::{BatchConfig, IncompleteTessellation};
pub use error::{BatchError, GeometryError, UsageError};
pub use flush::{FlushStats, Packer};
pub use polygon::{
    Polygon, QuadStyle, TexCoords, TextureHandle, TextureId, Vertex, MAX_POLYGON_VERTICES,
    QUAD_INDICES, TRIANGLE_INDICES,
};
pub use pool::{TessellatorLease, TessellatorPool};
pub use renderer::{FlushReport, GeometryBatch};
pub use scheduler::{PolygonFailure, TessellationScheduler};
pub use sort::{compare_keys, SortMode};
pub use sprite::{Placement, Sprite, SpriteEffects};
pub use state::{
    BatchSettings, BlendMode, CullMode, DepthMode, EffectId, RenderState, SamplerMode,
};
pub use tessellate::TessellatorContext;
pub use texel::TexelCache;
pub use text::TextStyle;

/// Triangulates `polygon` on the calling thread if it has no indices yet.
///
/// Uses a context from `pool`. On failure the polygon is left unindexed.
pub fn tessellate(polygon: &mut Polygon, pool: &TessellatorPool) -> Result<(), BatchError> {
    if polygon.is_indexed() {
        return Ok(());
    }
    let indices = pool.lease().triangulate(polygon.vertices())?;
    polygon.set_indices(indices);
    Ok(())
}
