use super::Vec2;

/// Axis-aligned rectangle in pixels (top-left origin).
///
/// Used both for destination placement and for source regions in texels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Flips negative extents so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let Rect { mut origin, mut size } = self;
        if size.x < 0.0 {
            origin.x += size.x;
            size.x = -size.x;
        }
        if size.y < 0.0 {
            origin.y += size.y;
            size.y = -size.y;
        }
        Rect { origin, size }
    }

    /// Scales origin and size component-wise, e.g. texels to UV space.
    #[inline]
    pub fn scaled(self, scale: Vec2) -> Self {
        Rect {
            origin: self.origin.mul_elem(scale),
            size: self.size.mul_elem(scale),
        }
    }
}
