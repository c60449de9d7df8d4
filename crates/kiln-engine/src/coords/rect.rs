use super::{Size, Vec2};

/// Axis-aligned rectangle in logical pixels (top-left origin).
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
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Smallest rectangle containing every point, or `None` for no points or
    /// non-finite input.
    pub fn bounding(points: &[Vec2]) -> Option<Rect> {
        let first = *points.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        let r = Rect::new(x0, y0, x1 - x0, y1 - y0);
        r.origin.is_finite().then_some(r).filter(|r| r.size.is_finite())
    }

    /// Same area with non-negative width and height.
    #[inline]
    pub fn normalized(self) -> Self {
        let flip = |pos: f32, len: f32| if len < 0.0 { (pos + len, -len) } else { (pos, len) };
        let (x, w) = flip(self.origin.x, self.size.x);
        let (y, h) = flip(self.origin.y, self.size.y);
        Rect::new(x, y, w, h)
    }

    /// Grows every edge outward by `by`.
    #[inline]
    pub fn inflated(self, by: f32) -> Self {
        let grow = Vec2::new(by * 2.0, by * 2.0);
        Rect { origin: self.origin - Vec2::new(by, by), size: self.size + grow }
    }

    /// Overlap of two rectangles. Rectangles that only share an edge do not
    /// overlap.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let (a, b) = (self.normalized(), other.normalized());
        let (amax, bmax) = (a.max(), b.max());
        let lo = Vec2::new(a.origin.x.max(b.origin.x), a.origin.y.max(b.origin.y));
        let hi = Vec2::new(amax.x.min(bmax.x), amax.y.min(bmax.y));
        (hi.x > lo.x && hi.y > lo.y).then(|| Rect::new(lo.x, lo.y, hi.x - lo.x, hi.y - lo.y))
    }

    /// Integer pixel span `[x0, x1) x [y0, y1)` touched by this rectangle,
    /// clipped to a surface of size `clip`.
    pub fn pixel_span(self, clip: Size) -> Option<(u32, u32, u32, u32)> {
        let surface = Rect::new(0.0, 0.0, clip.width as f32, clip.height as f32);
        let r = self.intersect(surface)?;
        let max = r.max();
        let x0 = r.origin.x.floor().max(0.0) as u32;
        let y0 = r.origin.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil() as u32).min(clip.width);
        let y1 = (max.y.ceil() as u32).min(clip.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}
