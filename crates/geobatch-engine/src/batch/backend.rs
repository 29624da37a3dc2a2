use crate::coords::{Mat4, Viewport};

use super::polygon::{TextureId, Vertex};
use super::state::{EffectId, RenderState};

/// Graphics device as seen by the render flush.
///
/// All calls come from the thread running `end`, in order. The vertex and
/// index slices are only valid for the duration of the call.
pub trait GraphicsBackend {
    /// Current render target size in pixels.
    fn viewport(&self) -> Viewport;

    /// Sets blend/sampler/depth/cull state and the world-view-projection
    /// matrix for the following draws.
    fn apply_state(&mut self, state: &RenderState, transform: &Mat4);

    fn bind_texture(&mut self, texture: TextureId);

    /// Pass count of a registered effect. `None` if it was disposed or never
    /// registered.
    fn effect_pass_count(&self, effect: EffectId) -> Option<usize>;

    fn apply_effect_pass(&mut self, effect: EffectId, pass: usize);

    /// Draws a triangle list. Indices address `vertices`.
    fn draw_indexed_triangles(&mut self, vertices: &[Vertex], indices: &[u16]);
}
