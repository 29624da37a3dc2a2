//! 4x4 matrix in row-vector convention.
//!
//! A point is transformed as `p * M`, so `a * b` applies `a` first and then `b`.
//! Translation lives in row 4 (`m[3][0..3]`). Uploaded to WGSL as-is, the
//! column-major read yields the transpose, and `M * v` in the shader gives the
//! same result as `v * M` here.

use core::ops::Mul;

use super::Vec2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Off-center orthographic projection.
    ///
    /// With `(0, w, h, 0)` this maps pixel space (top-left origin, +Y down) to
    /// clip space. Depth maps `near → 0`, `far → 1`.
    pub fn orthographic_off_center(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][0] = 2.0 / (right - left);
        out.m[1][1] = 2.0 / (top - bottom);
        out.m[2][2] = 1.0 / (near - far);
        out.m[3][0] = (left + right) / (left - right);
        out.m[3][1] = (top + bottom) / (bottom - top);
        out.m[3][2] = near / (near - far);
        out
    }

    /// 2D affine transform: rows 1-2 hold the linear part, row 4 the translation.
    pub fn from_affine_2d(x_axis: Vec2, y_axis: Vec2, translation: Vec2) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][0] = x_axis.x;
        out.m[0][1] = x_axis.y;
        out.m[1][0] = y_axis.x;
        out.m[1][1] = y_axis.y;
        out.m[3][0] = translation.x;
        out.m[3][1] = translation.y;
        out
    }

    #[inline]
    pub fn translation(t: Vec2) -> Self {
        Self::from_affine_2d(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), t)
    }

    #[inline]
    pub fn transform_point2(&self, p: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            p.x * m[0][0] + p.y * m[1][0] + m[3][0],
            p.x * m[0][1] + p.y * m[1][1] + m[3][1],
        )
    }

    /// Transforms a direction (ignores translation).
    #[inline]
    pub fn transform_vector2(&self, v: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(v.x * m[0][0] + v.y * m[1][0], v.x * m[0][1] + v.y * m[1][1])
    }

    #[inline]
    pub fn to_array_2d(&self) -> [[f32; 4]; 4] {
        self.m
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Mat4 { m: out }
    }
}
