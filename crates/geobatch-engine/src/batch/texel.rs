use std::collections::HashMap;

use crate::coords::Vec2;

use super::error::UsageError;
use super::polygon::{TextureHandle, TextureId};

/// Memoized `(1/width, 1/height)` per texture.
///
/// Keyed by texture id. Entries live as long as the batch; stale entries for
/// released textures are harmless since ids are not reused by the backends.
#[derive(Debug, Default)]
pub struct TexelCache {
    scales: HashMap<TextureId, Vec2>,
}

impl TexelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texel_scale(&mut self, texture: TextureHandle) -> Result<Vec2, UsageError> {
        if texture.is_empty() {
            return Err(UsageError::EmptyTexture);
        }
        Ok(*self.scales.entry(texture.id).or_insert_with(|| {
            Vec2::new(1.0 / texture.width as f32, 1.0 / texture.height as f32)
        }))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn forget(&mut self, texture: TextureId) {
        self.scales.remove(&texture);
    }
}
