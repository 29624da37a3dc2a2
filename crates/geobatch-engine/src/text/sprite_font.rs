use std::collections::HashMap;

use crate::batch::{TextureHandle, UsageError};
use crate::coords::{Rect, Vec2};

/// Placement data of one character.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Glyph {
    /// Region of the atlas, in texels.
    pub bounds: Rect,
    /// Offset of the bitmap from the pen position; `size.y` is the line box height.
    pub cropping: Rect,
    pub left_side_bearing: f32,
    /// Advance excluding bearings.
    pub width: f32,
    pub right_side_bearing: f32,
}

/// Texture atlas plus glyph table.
#[derive(Debug, Clone)]
pub struct SpriteFont {
    texture: TextureHandle,
    glyphs: HashMap<char, Glyph>,
    line_spacing: f32,
    spacing: f32,
    default_char: Option<char>,
}

impl SpriteFont {
    pub fn new(texture: TextureHandle, glyphs: HashMap<char, Glyph>, line_spacing: f32) -> Self {
        Self {
            texture,
            glyphs,
            line_spacing,
            spacing: 0.0,
            default_char: None,
        }
    }

    /// Extra space between characters.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Substitute for characters missing from the table.
    pub fn with_default_char(mut self, c: char) -> Self {
        self.default_char = Some(c);
        self
    }

    #[inline]
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    #[inline]
    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    #[inline]
    pub fn default_char(&self) -> Option<char> {
        self.default_char
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    /// Glyph for `c`, falling back to the default character.
    pub fn glyph(&self, c: char) -> Result<&Glyph, UsageError> {
        self.glyphs
            .get(&c)
            .or_else(|| self.default_char.and_then(|d| self.glyphs.get(&d)))
            .ok_or(UsageError::UnknownGlyph(c))
    }

    /// Size of `text` as laid out by `draw_string`.
    pub fn measure_string(&self, text: &str) -> Result<Vec2, UsageError> {
        if text.is_empty() {
            return Ok(Vec2::ZERO);
        }

        let mut width = 0.0f32;
        let mut line_height = self.line_spacing;
        let mut offset = Vec2::ZERO;
        let mut first_of_line = true;

        for c in text.chars() {
            match c {
                '\r' => continue,
                '\n' => {
                    line_height = self.line_spacing;
                    offset.x = 0.0;
                    offset.y += self.line_spacing;
                    first_of_line = true;
                    continue;
                }
                _ => {}
            }

            let glyph = self.glyph(c)?;
            if first_of_line {
                offset.x = glyph.left_side_bearing.max(0.0);
                first_of_line = false;
            } else {
                offset.x += self.spacing + glyph.left_side_bearing;
            }

            offset.x += glyph.width;
            width = width.max(offset.x + glyph.right_side_bearing.max(0.0));
            offset.x += glyph.right_side_bearing;

            line_height = line_height.max(glyph.cropping.height());
        }

        Ok(Vec2::new(width, offset.y + line_height))
    }
}
