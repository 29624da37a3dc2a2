//! geobatch engine crate.
//!
//! Batches textured 2D polygons into few draw calls. Outlines that are not
//! quads or triangles are triangulated on worker threads while the caller
//! keeps submitting; `GeometryBatch::end` sorts and packs everything for a
//! [`batch::GraphicsBackend`]. [`render::WgpuBackend`] is the wgpu one.

pub mod batch;
pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
