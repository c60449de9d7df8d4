use super::Vec2;

/// 2D affine transform.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`. Every builder method
/// concatenates on the right: the new operation applies to coordinates
/// *before* the existing transform, so `t.translate(..).rotate(..)` rotates
/// in the translated frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// True when the transform has no rotation or shear.
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        self.b == 0.0 && self.c == 0.0
    }

    /// `self * rhs`: applies `rhs` first, then `self`.
    pub fn then_before(&self, rhs: &Affine) -> Affine {
        Affine {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        *self = self.then_before(&Affine { e: tx, f: ty, ..Self::IDENTITY });
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        *self = self.then_before(&Affine { a: sx, d: sy, ..Self::IDENTITY });
    }

    /// Rotates by `theta` radians around `(cx, cy)`.
    pub fn rotate_about(&mut self, theta: f32, cx: f32, cy: f32) {
        let (sin, cos) = theta.sin_cos();
        self.translate(cx, cy);
        *self = self.then_before(&Affine { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 });
        self.translate(-cx, -cy);
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Applies only the linear part (no translation).
    #[inline]
    pub fn apply_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Average linear scale, used to size strokes in device space.
    pub fn mean_scale(&self) -> f32 {
        let det = (self.a * self.d - self.b * self.c).abs();
        det.sqrt()
    }
}
