use core::cmp::Ordering;

/// How a batch orders its polygons at flush time.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SortMode {
    /// Submission order (keys are NaN).
    #[default]
    Deferred,
    /// Draw each polygon as it is submitted. Not supported.
    Immediate,
    /// Group by texture. Not supported.
    Texture,
    /// Depth 1 (back) first, depth 0 (front) last.
    BackToFront,
    /// Depth 0 (front) first, depth 1 (back) last.
    FrontToBack,
}

impl SortMode {
    #[inline]
    pub fn is_supported(self) -> bool {
        !matches!(self, SortMode::Immediate | SortMode::Texture)
    }

    /// Sort key for a shape drawn at `layer_depth`.
    #[inline]
    pub fn key_for_depth(self, layer_depth: f32) -> f32 {
        match self {
            SortMode::FrontToBack => layer_depth,
            SortMode::BackToFront => -layer_depth,
            _ => f32::NAN,
        }
    }
}

/// Total order over sort keys: NaN is below every number and equal to other NaN.
#[inline]
pub fn compare_keys(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_sorts_first_and_stays_stable() {
        let mut keys = vec![(2.0, 'a'), (f32::NAN, 'b'), (1.0, 'c'), (f32::NAN, 'd')];
        keys.sort_by(|a, b| compare_keys(a.0, b.0));
        let order: String = keys.iter().map(|k| k.1).collect();
        assert_eq!(order, "bdca");
    }

    #[test]
    fn depth_key_follows_mode() {
        assert_eq!(SortMode::FrontToBack.key_for_depth(0.25), 0.25);
        assert_eq!(SortMode::BackToFront.key_for_depth(0.25), -0.25);
        assert!(SortMode::Deferred.key_for_depth(0.25).is_nan());
    }

    #[test]
    fn immediate_and_texture_are_unsupported() {
        assert!(!SortMode::Immediate.is_supported());
        assert!(!SortMode::Texture.is_supported());
        assert!(SortMode::Deferred.is_supported());
    }
}
