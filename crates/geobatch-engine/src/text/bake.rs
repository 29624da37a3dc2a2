use std::collections::HashMap;

use crate::batch::{BatchError, TextureHandle};
use crate::coords::Rect;

use super::{Glyph, SpriteFont};

/// Printable ASCII.
pub const DEFAULT_CHARSET: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

const ATLAS_WIDTH: u32 = 512;
const GLYPH_PADDING: u32 = 1;

/// Rasterized atlas plus glyph table, ready for upload.
///
/// `rgba` is premultiplied white, `width * height * 4` bytes.
pub struct BakedFont {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub glyphs: HashMap<char, Glyph>,
    pub line_spacing: f32,
}

impl BakedFont {
    /// Binds the glyph table to the uploaded atlas texture.
    pub fn into_sprite_font(self, texture: TextureHandle) -> SpriteFont {
        let font = SpriteFont::new(texture, self.glyphs, self.line_spacing);
        if font.contains('?') {
            font.with_default_char('?')
        } else {
            font
        }
    }
}

struct Placed {
    c: char,
    x: u32,
    y: u32,
    metrics: fontdue::Metrics,
    bitmap: Vec<u8>,
}

/// Rasterizes `chars` at `px` pixels into a shelf-packed atlas.
pub fn bake_font(bytes: &[u8], px: f32, chars: &str) -> Result<BakedFont, BatchError> {
    let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| BatchError::Font(e.to_string()))?;

    let line = font
        .horizontal_line_metrics(px)
        .ok_or_else(|| BatchError::Font("font has no horizontal line metrics".into()))?;
    let ascent = line.ascent.ceil();
    let line_spacing = line.new_line_size.ceil();

    // Shelf packing: fill a row left to right, start a new row when full.
    let mut placed = Vec::new();
    let mut cursor_x = GLYPH_PADDING;
    let mut cursor_y = GLYPH_PADDING;
    let mut row_height = 0;

    for c in chars.chars() {
        let (metrics, bitmap) = font.rasterize(c, px);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w + 2 * GLYPH_PADDING > ATLAS_WIDTH {
            return Err(BatchError::Font(format!("glyph {c:?} is wider than the atlas")));
        }

        if cursor_x + w + GLYPH_PADDING > ATLAS_WIDTH {
            cursor_y += row_height + GLYPH_PADDING;
            cursor_x = GLYPH_PADDING;
            row_height = 0;
        }

        placed.push(Placed { c, x: cursor_x, y: cursor_y, metrics, bitmap });
        cursor_x += w + GLYPH_PADDING;
        row_height = row_height.max(h);
    }

    let height = (cursor_y + row_height + GLYPH_PADDING).next_power_of_two();
    let mut rgba = vec![0u8; (ATLAS_WIDTH * height * 4) as usize];
    let mut glyphs = HashMap::with_capacity(placed.len());

    for p in placed {
        let m = &p.metrics;
        for row in 0..m.height {
            for col in 0..m.width {
                let coverage = p.bitmap[row * m.width + col];
                let dst = (((p.y as usize + row) * ATLAS_WIDTH as usize) + p.x as usize + col) * 4;
                rgba[dst..dst + 4].copy_from_slice(&[coverage; 4]);
            }
        }

        glyphs.insert(
            p.c,
            Glyph {
                bounds: Rect::new(p.x as f32, p.y as f32, m.width as f32, m.height as f32),
                cropping: Rect::new(
                    m.xmin as f32,
                    ascent - m.height as f32 - m.ymin as f32,
                    m.advance_width,
                    line_spacing,
                ),
                left_side_bearing: 0.0,
                width: m.advance_width,
                right_side_bearing: 0.0,
            },
        );
    }

    log::debug!(
        "baked {} glyphs at {px}px into a {ATLAS_WIDTH}x{height} atlas",
        glyphs.len()
    );

    Ok(BakedFont {
        width: ATLAS_WIDTH,
        height,
        rgba,
        glyphs,
        line_spacing,
    })
}
