//! Glyph-quad text submission.

use crate::coords::{Mat4, Rect, Vec2};
use crate::paint::Color;
use crate::text::{Glyph, SpriteFont};

use super::error::BatchError;
use super::polygon::{Polygon, QuadStyle, TexCoords};
use super::renderer::GeometryBatch;
use super::sprite::SpriteEffects;

/// Transform and appearance for [`GeometryBatch::draw_string_ext`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub rotation: f32,
    /// Pivot in unscaled text space.
    pub origin: Vec2,
    pub scale: Vec2,
    pub effects: SpriteEffects,
    pub layer_depth: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            rotation: 0.0,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            effects: SpriteEffects::empty(),
            layer_depth: 0.0,
        }
    }
}

/// Walks `text` glyph by glyph, yielding each glyph with its pen position.
///
/// `\r` is skipped and `\n` starts a new line. The first glyph of a line
/// never hangs off the left edge.
fn layout<'f>(
    font: &'f SpriteFont,
    text: &str,
    mut visit: impl FnMut(&'f Glyph, Vec2) -> Result<(), BatchError>,
) -> Result<usize, BatchError> {
    let mut offset = Vec2::ZERO;
    let mut first_of_line = true;
    let mut count = 0;

    for c in text.chars() {
        match c {
            '\r' => continue,
            '\n' => {
                offset.x = 0.0;
                offset.y += font.line_spacing();
                first_of_line = true;
                continue;
            }
            _ => {}
        }

        let glyph = font.glyph(c)?;
        if first_of_line {
            offset.x = glyph.left_side_bearing.max(0.0);
            first_of_line = false;
        } else {
            offset.x += font.spacing() + glyph.left_side_bearing;
        }

        visit(glyph, offset)?;
        count += 1;

        offset.x += glyph.width + glyph.right_side_bearing;
    }

    Ok(count)
}

impl GeometryBatch {
    /// Draws `text` at `position`, unscaled, sort key 0. Returns the number
    /// of glyph quads submitted.
    pub fn draw_string(
        &mut self,
        font: &SpriteFont,
        text: &str,
        position: Vec2,
        color: Color,
    ) -> Result<usize, BatchError> {
        self.sort_mode("draw_string")?;
        let texture = font.texture();
        let texel = self.texels.texel_scale(texture)?;
        let style = |g: &Glyph| QuadStyle {
            uv: TexCoords::from_source(g.bounds, texel),
            color,
            depth: 0.0,
        };

        layout(font, text, |glyph, pen| {
            let p = position + pen + glyph.cropping.origin;
            let dest = Rect::from_origin_size(p, glyph.bounds.size);
            self.append(Polygon::axis_quad(texture, 0.0, dest, style(glyph)))?;
            Ok(())
        })
    }

    /// Draws `text` rotated around `origin`, scaled and optionally flipped.
    /// The sort key follows the batch's sort mode and `layer_depth`.
    pub fn draw_string_ext(
        &mut self,
        font: &SpriteFont,
        text: &str,
        position: Vec2,
        style: &TextStyle,
    ) -> Result<usize, BatchError> {
        let key = self.sort_mode("draw_string")?.key_for_depth(style.layer_depth);
        let texture = font.texture();
        let texel = self.texels.texel_scale(texture)?;

        let flip_x = style.effects.contains(SpriteEffects::FLIP_HORIZONTALLY);
        let flip_y = style.effects.contains(SpriteEffects::FLIP_VERTICALLY);

        let mut origin = style.origin;
        let mut flip_adjust = Vec2::ZERO;
        if flip_x || flip_y {
            let size = font.measure_string(text)?;
            if flip_x {
                origin.x = -origin.x;
                flip_adjust.x = -size.x;
            }
            if flip_y {
                origin.y = -origin.y;
                flip_adjust.y = font.line_spacing() - size.y;
            }
        }

        let sx = if flip_x { -style.scale.x } else { style.scale.x };
        let sy = if flip_y { -style.scale.y } else { style.scale.y };
        let (sin, cos) = style.rotation.sin_cos();

        let x_axis = Vec2::new(sx * cos, sx * sin);
        let y_axis = Vec2::new(-sy * sin, sy * cos);
        let pivot = flip_adjust - origin;
        let translation = position + x_axis * pivot.x + y_axis * pivot.y;
        let transform = Mat4::from_affine_2d(x_axis, y_axis, translation);

        layout(font, text, |glyph, pen| {
            let mut local = pen + glyph.cropping.origin;
            if flip_x {
                local.x += glyph.bounds.width();
            }
            if flip_y {
                local.y += glyph.bounds.height() - font.line_spacing();
            }
            let p = transform.transform_point2(local);

            let quad_style = QuadStyle {
                uv: style.effects.apply(TexCoords::from_source(glyph.bounds, texel)),
                color: style.color,
                depth: style.layer_depth,
            };
            let size = glyph.bounds.size.mul_elem(style.scale);

            let polygon = if style.rotation == 0.0 {
                Polygon::axis_quad(texture, key, Rect::from_origin_size(p, size), quad_style)
            } else {
                Polygon::rotated_quad(texture, key, p, Vec2::ZERO, size, style.rotation, quad_style)
            };
            self.append(polygon)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::batch::backend::recording::RecordingBackend;
    use crate::batch::config::BatchConfig;
    use crate::batch::error::UsageError;
    use crate::batch::polygon::{TextureHandle, TextureId, Vertex};
    use crate::batch::state::BatchSettings;
    use approx::assert_relative_eq;

    fn font() -> SpriteFont {
        let mut glyphs = HashMap::new();
        let glyph = |x: f32, lsb: f32| Glyph {
            bounds: Rect::new(x, 0.0, 8.0, 10.0),
            cropping: Rect::new(0.0, 2.0, 8.0, 12.0),
            left_side_bearing: lsb,
            width: 8.0,
            right_side_bearing: 1.0,
        };
        glyphs.insert('A', glyph(0.0, 1.0));
        glyphs.insert('j', glyph(8.0, -2.0));
        SpriteFont::new(TextureHandle::new(TextureId(5), 32, 16), glyphs, 12.0)
    }

    fn open() -> GeometryBatch {
        let mut b =
            GeometryBatch::new(BatchConfig { worker_threads: Some(1), ..Default::default() })
                .unwrap();
        b.begin(BatchSettings::default()).unwrap();
        b
    }

    fn flushed(mut b: GeometryBatch) -> Vec<Vertex> {
        let mut backend = RecordingBackend::default();
        b.end(&mut backend).unwrap();
        backend.draws().first().map(|d| d.0.to_vec()).unwrap_or_default()
    }

    fn top_lefts(vs: &[Vertex]) -> Vec<(f32, f32)> {
        vs.chunks(4).map(|q| (q[0].position[0], q[0].position[1])).collect()
    }

    #[test]
    fn glyphs_advance_along_the_line() {
        let mut b = open();
        let n = b.draw_string(&font(), "AA", Vec2::new(10.0, 20.0), Color::WHITE).unwrap();
        assert_eq!(n, 2);

        // First: lsb 1. Second: 1 + 8 + 1 (rsb) + 1 (lsb).
        assert_eq!(top_lefts(&flushed(b)), vec![(11.0, 22.0), (21.0, 22.0)]);
    }

    #[test]
    fn newline_resets_pen_and_cr_is_skipped() {
        let mut b = open();
        let n = b.draw_string(&font(), "A\r\nA", Vec2::ZERO, Color::WHITE).unwrap();
        assert_eq!(n, 2);
        assert_eq!(top_lefts(&flushed(b)), vec![(1.0, 2.0), (1.0, 14.0)]);
    }

    #[test]
    fn negative_bearing_clamped_at_line_start() {
        let mut b = open();
        b.draw_string(&font(), "jj", Vec2::ZERO, Color::WHITE).unwrap();
        // First glyph clamps to 0; second: 0 + 8 + 1 − 2.
        assert_eq!(top_lefts(&flushed(b)), vec![(0.0, 2.0), (7.0, 2.0)]);
    }

    #[test]
    fn glyph_uvs_come_from_atlas_bounds() {
        let mut b = open();
        b.draw_string(&font(), "j", Vec2::ZERO, Color::WHITE).unwrap();
        let vs = flushed(b);
        assert_eq!(vs[0].uv, [0.25, 0.0]);
        assert_eq!(vs[3].uv, [0.5, 0.625]);
    }

    #[test]
    fn unknown_glyph_is_usage_error() {
        let mut b = open();
        let err = b.draw_string(&font(), "AZ", Vec2::ZERO, Color::WHITE).unwrap_err();
        assert!(matches!(err, BatchError::Usage(UsageError::UnknownGlyph('Z'))));
    }

    // ── extended ──────────────────────────────────────────────────────────

    #[test]
    fn ext_without_transform_matches_plain() {
        let mut plain = open();
        plain.draw_string(&font(), "AjA", Vec2::new(5.0, 5.0), Color::WHITE).unwrap();
        let mut ext = open();
        ext.draw_string_ext(&font(), "AjA", Vec2::new(5.0, 5.0), &TextStyle::default()).unwrap();

        assert_eq!(top_lefts(&flushed(plain)), top_lefts(&flushed(ext)));
    }

    #[test]
    fn ext_scale_and_origin() {
        let mut b = open();
        let style = TextStyle {
            origin: Vec2::new(1.0, 2.0),
            scale: Vec2::splat(2.0),
            ..Default::default()
        };
        b.draw_string_ext(&font(), "A", Vec2::new(100.0, 100.0), &style).unwrap();

        let vs = flushed(b);
        // Pen (1, 2) minus origin (1, 2) lands on the position.
        assert_eq!((vs[0].position[0], vs[0].position[1]), (100.0, 100.0));
        assert_eq!((vs[3].position[0], vs[3].position[1]), (116.0, 120.0));
    }

    #[test]
    fn ext_quarter_turn_rotates_pen_positions() {
        let mut b = open();
        let style = TextStyle {
            rotation: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        b.draw_string_ext(&font(), "AA", Vec2::ZERO, &style).unwrap();

        let quads = top_lefts(&flushed(b));
        // Pen x runs down the screen after a quarter turn.
        assert_relative_eq!(quads[1].0, -2.0, epsilon = 1e-4);
        assert_relative_eq!(quads[1].1, 11.0, epsilon = 1e-4);
    }

    #[test]
    fn ext_horizontal_flip_mirrors_layout() {
        let mut b = open();
        let style = TextStyle {
            effects: SpriteEffects::FLIP_HORIZONTALLY,
            ..Default::default()
        };
        b.draw_string_ext(&font(), "A", Vec2::ZERO, &style).unwrap();

        let vs = flushed(b);
        // Measured width 10; the glyph at pen 1 mirrors to 10 − (1 + 8) = 1.
        assert_relative_eq!(vs[0].position[0], 1.0, epsilon = 1e-4);
        assert_eq!(vs[0].uv, [0.25, 0.0]);
    }
}
