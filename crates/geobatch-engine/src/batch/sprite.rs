//! Sprite submission helpers.

use bitflags::bitflags;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::error::BatchError;
use super::polygon::{Polygon, QuadStyle, TexCoords, TextureHandle};
use super::renderer::GeometryBatch;

bitflags! {
    /// Mirroring applied to a sprite's texture coordinates.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct SpriteEffects: u8 {
        const FLIP_HORIZONTALLY = 1 << 0;
        const FLIP_VERTICALLY = 1 << 1;
    }
}

impl SpriteEffects {
    #[inline]
    pub(crate) fn apply(self, uv: TexCoords) -> TexCoords {
        let mut uv = uv;
        if self.contains(SpriteEffects::FLIP_VERTICALLY) {
            uv = uv.flip_y();
        }
        if self.contains(SpriteEffects::FLIP_HORIZONTALLY) {
            uv = uv.flip_x();
        }
        uv
    }
}

/// Where a sprite lands on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Placement {
    /// Top-left (minus origin) at `position`, source size times `scale`.
    At { position: Vec2, scale: Vec2 },
    /// Stretched over `dest`; `origin` is in source texels and scaled to it.
    Stretch(Rect),
}

/// Full sprite description.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub texture: TextureHandle,
    pub placement: Placement,
    /// Texel region to draw; `None` draws the whole texture.
    pub source: Option<Rect>,
    pub color: Color,
    /// Radians, clockwise on screen.
    pub rotation: f32,
    /// Rotation center, in source texels.
    pub origin: Vec2,
    pub effects: SpriteEffects,
    pub layer_depth: f32,
}

impl Sprite {
    pub fn at(texture: TextureHandle, position: Vec2) -> Self {
        Self::new(texture, Placement::At { position, scale: Vec2::ONE })
    }

    pub fn stretched(texture: TextureHandle, dest: Rect) -> Self {
        Self::new(texture, Placement::Stretch(dest))
    }

    fn new(texture: TextureHandle, placement: Placement) -> Self {
        Self {
            texture,
            placement,
            source: None,
            color: Color::WHITE,
            rotation: 0.0,
            origin: Vec2::ZERO,
            effects: SpriteEffects::empty(),
            layer_depth: 0.0,
        }
    }

    pub fn source(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn rotation(mut self, radians: f32, origin: Vec2) -> Self {
        self.rotation = radians;
        self.origin = origin;
        self
    }

    /// Only meaningful for [`Placement::At`].
    pub fn scale(mut self, scale: Vec2) -> Self {
        if let Placement::At { scale: s, .. } = &mut self.placement {
            *s = scale;
        }
        self
    }

    pub fn effects(mut self, effects: SpriteEffects) -> Self {
        self.effects = effects;
        self
    }

    pub fn layer_depth(mut self, depth: f32) -> Self {
        self.layer_depth = depth;
        self
    }
}

impl GeometryBatch {
    /// Submits a sprite. Returns its submission slot.
    pub fn draw_sprite(&mut self, sprite: &Sprite) -> Result<usize, BatchError> {
        let key = self.sort_mode("draw_sprite")?.key_for_depth(sprite.layer_depth);
        let texel = self.texels.texel_scale(sprite.texture)?;

        let (uv, source_size) = match sprite.source {
            Some(src) => (TexCoords::from_source(src, texel), src.size),
            None => (TexCoords::FULL, sprite.texture.size()),
        };

        let (anchor, size, origin) = match sprite.placement {
            Placement::At { position, scale } => {
                (position, source_size.mul_elem(scale), sprite.origin.mul_elem(scale))
            }
            Placement::Stretch(dest) => {
                // Origin is given in source texels; map it into the destination.
                let per_texel = |dest_len: f32, src_len: f32, texel: f32| {
                    if src_len != 0.0 && sprite.source.is_some() {
                        dest_len / src_len
                    } else {
                        dest_len * texel
                    }
                };
                let origin = Vec2::new(
                    sprite.origin.x * per_texel(dest.width(), source_size.x, texel.x),
                    sprite.origin.y * per_texel(dest.height(), source_size.y, texel.y),
                );
                (dest.origin, dest.size, origin)
            }
        };

        let style = QuadStyle {
            uv: sprite.effects.apply(uv),
            color: sprite.color,
            depth: sprite.layer_depth,
        };

        let polygon = if sprite.rotation == 0.0 {
            Polygon::axis_quad(
                sprite.texture,
                key,
                Rect::from_origin_size(anchor - origin, size),
                style,
            )
        } else {
            Polygon::rotated_quad(sprite.texture, key, anchor, -origin, size, sprite.rotation, style)
        };

        self.append(polygon)
    }

    /// Whole texture at `position`, unscaled, sort key 0.
    pub fn draw_texture(
        &mut self,
        texture: TextureHandle,
        position: Vec2,
        color: Color,
    ) -> Result<usize, BatchError> {
        self.draw_texture_rect(
            texture,
            Rect::from_origin_size(position, texture.size()),
            None,
            color,
        )
    }

    /// Texture (or a texel region of it) stretched over `dest`, sort key 0.
    pub fn draw_texture_rect(
        &mut self,
        texture: TextureHandle,
        dest: Rect,
        source: Option<Rect>,
        color: Color,
    ) -> Result<usize, BatchError> {
        self.sort_mode("draw_texture")?;
        let texel = self.texels.texel_scale(texture)?;
        let uv = source.map_or(TexCoords::FULL, |src| TexCoords::from_source(src, texel));

        let style = QuadStyle { uv, color, depth: 0.0 };
        self.append(Polygon::axis_quad(texture, 0.0, dest, style))
    }
}
