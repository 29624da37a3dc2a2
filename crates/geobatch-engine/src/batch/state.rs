//! Device state applied once per batch.

use crate::coords::Mat4;

use super::sort::SortMode;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Premultiplied source over destination.
    #[default]
    AlphaBlend,
    Additive,
    Opaque,
    /// Straight-alpha source over destination.
    NonPremultiplied,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum SamplerMode {
    #[default]
    LinearClamp,
    LinearWrap,
    PointClamp,
    PointWrap,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DepthMode {
    #[default]
    None,
    Default,
    DepthRead,
}

/// Which winding gets culled.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CullMode {
    None,
    Clockwise,
    #[default]
    CounterClockwise,
}

/// Backend-registered shader effect.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EffectId(pub u64);

/// Per-batch settings passed to `begin`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BatchSettings {
    pub sort_mode: SortMode,
    pub blend: BlendMode,
    pub sampler: SamplerMode,
    pub depth: DepthMode,
    pub cull: CullMode,
    pub effect: Option<EffectId>,
    /// Applied before the projection.
    pub transform: Mat4,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::Deferred,
            blend: BlendMode::default(),
            sampler: SamplerMode::default(),
            depth: DepthMode::default(),
            cull: CullMode::default(),
            effect: None,
            transform: Mat4::IDENTITY,
        }
    }
}

impl BatchSettings {
    #[inline]
    pub fn with_sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    #[inline]
    pub fn with_effect(mut self, effect: EffectId) -> Self {
        self.effect = Some(effect);
        self
    }

    #[inline]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    pub fn render_state(&self) -> RenderState {
        RenderState {
            blend: self.blend,
            sampler: self.sampler,
            depth: self.depth,
            cull: self.cull,
        }
    }
}

/// Fixed-function state handed to the backend.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct RenderState {
    pub blend: BlendMode,
    pub sampler: SamplerMode,
    pub depth: DepthMode,
    pub cull: CullMode,
}
