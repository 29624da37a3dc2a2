//! Polygon submissions: textured vertices plus (possibly pending) triangle indices.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::error::UsageError;

/// Constant triangulation of a 4-vertex quad laid out TL, TR, BL, BR.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 3, 2];

/// Triangulation of a lone triangle.
pub const TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];

/// Largest vertex count addressable by `u16` indices.
pub const MAX_POLYGON_VERTICES: usize = u16::MAX as usize + 1;

// ── vertex ────────────────────────────────────────────────────────────────

/// Position (pixels, z = layer depth), premultiplied color, texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec2, depth: f32, color: Color, uv: Vec2) -> Self {
        Self {
            position: [position.x, position.y, depth],
            color: color.to_array(),
            uv: [uv.x, uv.y],
        }
    }

    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }
}

// ── texture handle ────────────────────────────────────────────────────────

/// Backend-assigned texture identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(pub u64);

/// Opaque texture reference carried by each polygon.
///
/// Equality and hashing use the id only; two handles with the same id are the
/// same texture whatever size they claim.
#[derive(Debug, Copy, Clone)]
pub struct TextureHandle {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl TextureHandle {
    #[inline]
    pub const fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TextureHandle {}

impl Hash for TextureHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ── quad helpers ──────────────────────────────────────────────────────────

/// Texture coordinates of a quad's top-left and bottom-right corners.
///
/// Flipping swaps the corners on one axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TexCoords {
    pub tl: Vec2,
    pub br: Vec2,
}

impl TexCoords {
    pub const FULL: TexCoords = TexCoords { tl: Vec2::ZERO, br: Vec2::ONE };

    /// UVs of a texel-space source rectangle, given `1/size` of the texture.
    #[inline]
    pub fn from_source(source: Rect, texel_scale: Vec2) -> Self {
        let uv = source.scaled(texel_scale);
        Self { tl: uv.origin, br: uv.max() }
    }

    #[inline]
    pub fn flip_x(self) -> Self {
        Self {
            tl: Vec2::new(self.br.x, self.tl.y),
            br: Vec2::new(self.tl.x, self.br.y),
        }
    }

    #[inline]
    pub fn flip_y(self) -> Self {
        Self {
            tl: Vec2::new(self.tl.x, self.br.y),
            br: Vec2::new(self.br.x, self.tl.y),
        }
    }
}

/// Per-quad appearance shared by the quad constructors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadStyle {
    pub uv: TexCoords,
    pub color: Color,
    pub depth: f32,
}

impl Default for QuadStyle {
    fn default() -> Self {
        Self { uv: TexCoords::FULL, color: Color::WHITE, depth: 0.0 }
    }
}

// ── polygon ───────────────────────────────────────────────────────────────

/// One submitted shape.
///
/// Vertices are shared (`Arc`) so the tessellation workers can read them
/// without copying. Indices are `None` until triangulation completes; 3- and
/// 4-vertex polygons are indexed at construction.
#[derive(Debug, Clone)]
pub struct Polygon {
    texture: TextureHandle,
    sort_key: f32,
    vertices: Arc<[Vertex]>,
    indices: Option<Cow<'static, [u16]>>,
}

impl Polygon {
    /// Arbitrary polygon from its outline, in contour order.
    pub fn new(
        texture: TextureHandle,
        sort_key: f32,
        vertices: impl Into<Arc<[Vertex]>>,
    ) -> Result<Self, UsageError> {
        let vertices = vertices.into();
        validate_vertices(&vertices)?;

        let indices = match vertices.len() {
            3 => Some(Cow::Borrowed(&TRIANGLE_INDICES[..])),
            4 => Some(Cow::Borrowed(&QUAD_INDICES[..])),
            _ => None,
        };

        Ok(Self { texture, sort_key, vertices, indices })
    }

    /// Polygon with a caller-supplied triangle list.
    pub fn with_indices(
        texture: TextureHandle,
        sort_key: f32,
        vertices: impl Into<Arc<[Vertex]>>,
        indices: impl Into<Cow<'static, [u16]>>,
    ) -> Result<Self, UsageError> {
        let vertices = vertices.into();
        let indices = indices.into();
        validate_vertices(&vertices)?;

        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(UsageError::InvalidPolygon(format!(
                "index count {} is not a positive multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(UsageError::InvalidPolygon(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }

        Ok(Self { texture, sort_key, vertices, indices: Some(indices) })
    }

    /// Axis-aligned quad covering `dest`.
    pub fn axis_quad(texture: TextureHandle, sort_key: f32, dest: Rect, style: QuadStyle) -> Self {
        let QuadStyle { uv, color, depth } = style;
        let min = dest.origin;
        let max = dest.max();

        let vertices = [
            Vertex::new(min, depth, color, uv.tl),
            Vertex::new(Vec2::new(max.x, min.y), depth, color, Vec2::new(uv.br.x, uv.tl.y)),
            Vertex::new(Vec2::new(min.x, max.y), depth, color, Vec2::new(uv.tl.x, uv.br.y)),
            Vertex::new(max, depth, color, uv.br),
        ];

        Self::quad(texture, sort_key, vertices)
    }

    /// Quad of `size` whose local top-left sits at `offset` from `position`,
    /// rotated by `rotation` radians around `position`.
    pub fn rotated_quad(
        texture: TextureHandle,
        sort_key: f32,
        position: Vec2,
        offset: Vec2,
        size: Vec2,
        rotation: f32,
        style: QuadStyle,
    ) -> Self {
        let QuadStyle { uv, color, depth } = style;
        let (sin, cos) = rotation.sin_cos();
        let corner = |lx: f32, ly: f32| {
            Vec2::new(
                position.x + lx * cos - ly * sin,
                position.y + lx * sin + ly * cos,
            )
        };

        let (x0, y0) = (offset.x, offset.y);
        let (x1, y1) = (offset.x + size.x, offset.y + size.y);

        let vertices = [
            Vertex::new(corner(x0, y0), depth, color, uv.tl),
            Vertex::new(corner(x1, y0), depth, color, Vec2::new(uv.br.x, uv.tl.y)),
            Vertex::new(corner(x0, y1), depth, color, Vec2::new(uv.tl.x, uv.br.y)),
            Vertex::new(corner(x1, y1), depth, color, uv.br),
        ];

        Self::quad(texture, sort_key, vertices)
    }

    /// Quad from vertices already laid out TL, TR, BL, BR.
    #[inline]
    pub fn quad(texture: TextureHandle, sort_key: f32, vertices: [Vertex; 4]) -> Self {
        Self {
            texture,
            sort_key,
            vertices: Arc::new(vertices),
            indices: Some(Cow::Borrowed(&QUAD_INDICES[..])),
        }
    }

    #[inline]
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    #[inline]
    pub fn sort_key(&self) -> f32 {
        self.sort_key
    }

    #[inline]
    pub fn set_sort_key(&mut self, key: f32) {
        self.sort_key = key;
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub(crate) fn shared_vertices(&self) -> Arc<[Vertex]> {
        Arc::clone(&self.vertices)
    }

    #[inline]
    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    #[inline]
    pub(crate) fn set_indices(&mut self, indices: Vec<u16>) {
        self.indices = Some(Cow::Owned(indices));
    }

    /// Index count once triangulated: known, or `3·(N−2)` for a simple N-gon.
    #[inline]
    pub fn expected_index_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => 3 * (self.vertices.len() - 2),
        }
    }
}

fn validate_vertices(vertices: &[Vertex]) -> Result<(), UsageError> {
    if vertices.len() < 3 {
        return Err(UsageError::InvalidPolygon(format!(
            "a polygon needs at least 3 vertices, got {}",
            vertices.len()
        )));
    }
    if vertices.len() > MAX_POLYGON_VERTICES {
        return Err(UsageError::InvalidPolygon(format!(
            "{} vertices exceed the u16 index range",
            vertices.len()
        )));
    }
    if let Some(v) = vertices.iter().find(|v| !v.xy().is_finite()) {
        return Err(UsageError::InvalidPolygon(format!(
            "non-finite vertex position {:?}",
            v.position
        )));
    }
    Ok(())
}
