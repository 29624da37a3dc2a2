//! Vertex color types.

mod color;

pub use color::Color;
