//! GPU rendering subsystem.
//!
//! [`WgpuBackend`] implements the batch's [`GraphicsBackend`](crate::batch::GraphicsBackend)
//! on wgpu. Draws are recorded while a batch flushes and encoded into a
//! render pass afterwards.
//!
//! Convention:
//! - CPU geometry is in pixels (top-left origin, +Y down).
//! - The vertex shader applies the batch's world-view-projection uniform.

mod ctx;
mod wgpu_backend;

pub use ctx::{RenderCtx, RenderTarget};
pub use wgpu_backend::WgpuBackend;
