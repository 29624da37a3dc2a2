//! Coordinate and geometry types shared by the batcher and the backends.
//!
//! Canonical CPU space:
//! - Pixels, origin top-left
//! - +X right, +Y down
//! - Z carries the layer depth in `[0, 1]`
//!
//! The batch projection maps this space to clip space; see [`Mat4::orthographic_off_center`].

mod matrix;
mod rect;
mod vec2;
mod viewport;

pub use matrix::Mat4;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
