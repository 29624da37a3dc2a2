//! Bitmap fonts for glyph-quad text.
//!
//! A [`SpriteFont`] pairs a texture atlas with per-character glyph metrics.
//! [`bake_font`] builds one from TrueType/OpenType bytes with `fontdue`.

mod bake;
mod sprite_font;

pub use bake::{bake_font, BakedFont, DEFAULT_CHARSET};
pub use sprite_font::{Glyph, SpriteFont};
