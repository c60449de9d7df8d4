//! Coverage accumulation for shapes.
//!
//! Shapes are rasterized into a mask covering their device-space bounds and
//! composited once, so overlapping stroke segments never double-blend.

use crate::coords::{Rect, Size, Vec2};

/// Sub-scanlines per pixel row when antialiasing.
const AA_ROWS: usize = 4;

pub(crate) struct CoverageMask {
    pub x0: u32,
    pub y0: u32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl CoverageMask {
    /// Mask over the pixels touched by `bounds`, clipped to `clip`.
    pub fn covering(bounds: Rect, clip: Size) -> Option<Self> {
        // Outlines run through pixel centers and may spill half a pixel.
        let grown = Rect::new(
            bounds.origin.x - 1.0,
            bounds.origin.y - 1.0,
            bounds.size.x + 2.0,
            bounds.size.y + 2.0,
        );
        let (x0, y0, x1, y1) = grown.pixel_span(clip)?;
        let (width, height) = (x1 - x0, y1 - y0);
        Some(Self { x0, y0, width, height, data: vec![0.0; (width * height) as usize] })
    }

    /// Device-space corners of the masked area.
    pub fn device_bounds(&self) -> (Vec2, Vec2) {
        let lo = Vec2::new(self.x0 as f32, self.y0 as f32);
        let hi = Vec2::new((self.x0 + self.width) as f32, (self.y0 + self.height) as f32);
        (lo, hi)
    }

    #[inline]
    fn slot(&mut self, x: i64, y: i64) -> Option<&mut f32> {
        let lx = x - i64::from(self.x0);
        let ly = y - i64::from(self.y0);
        if lx < 0 || ly < 0 || lx >= i64::from(self.width) || ly >= i64::from(self.height) {
            return None;
        }
        self.data.get_mut((ly * i64::from(self.width) + lx) as usize)
    }

    /// Marks a single device pixel as fully covered.
    #[inline]
    pub fn plot(&mut self, x: i64, y: i64) {
        if let Some(c) = self.slot(x, y) {
            *c = 1.0;
        }
    }

    /// Rasterizes a closed polygon with the even-odd rule and merges it into
    /// the mask by taking the per-pixel maximum.
    pub fn add_polygon(&mut self, points: &[Vec2], antialias: bool) {
        if points.len() < 3 {
            return;
        }

        let samples = if antialias { AA_ROWS } else { 1 };
        let weight = 1.0 / samples as f32;
        let mut row = vec![0.0f32; self.width as usize];
        let mut xs: Vec<f32> = Vec::with_capacity(points.len());

        for ly in 0..self.height {
            row.iter_mut().for_each(|c| *c = 0.0);
            let py = (self.y0 + ly) as f32;

            for s in 0..samples {
                let sy = py + (s as f32 + 0.5) * weight;

                xs.clear();
                for i in 0..points.len() {
                    let p = points[i];
                    let q = points[(i + 1) % points.len()];
                    if (p.y <= sy) != (q.y <= sy) {
                        xs.push(p.x + (sy - p.y) * (q.x - p.x) / (q.y - p.y));
                    }
                }
                xs.sort_by(|a, b| a.total_cmp(b));

                for pair in xs.chunks_exact(2) {
                    let (a, b) = (pair[0] - self.x0 as f32, pair[1] - self.x0 as f32);
                    if antialias {
                        span_coverage(&mut row, a, b, weight);
                    } else {
                        span_centers(&mut row, a, b);
                    }
                }
            }

            let base = (ly * self.width) as usize;
            for (dst, src) in self.data[base..base + self.width as usize].iter_mut().zip(&row) {
                *dst = dst.max(src.min(1.0));
            }
        }
    }
}

/// Pixels whose center lies in `[a, b)`.
fn span_centers(row: &mut [f32], a: f32, b: f32) {
    let start = (a - 0.5).ceil().max(0.0) as usize;
    let end = ((b - 0.5).ceil().max(0.0) as usize).min(row.len());
    for c in row.iter_mut().take(end).skip(start) {
        *c = 1.0;
    }
}

/// Adds the horizontal overlap of `[a, b)` with each pixel, scaled by `weight`.
fn span_coverage(row: &mut [f32], a: f32, b: f32, weight: f32) {
    let a = a.max(0.0);
    let b = b.min(row.len() as f32);
    if b <= a {
        return;
    }
    let first = a.floor() as usize;
    let last = (b.ceil() as usize).min(row.len());
    for (x, c) in row.iter_mut().enumerate().take(last).skip(first) {
        let lo = a.max(x as f32);
        let hi = b.min(x as f32 + 1.0);
        if hi > lo {
            *c += (hi - lo) * weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, s: f32) -> Vec<Vec2> {
        vec![Vec2::new(x, y), Vec2::new(x + s, y), Vec2::new(x + s, y + s), Vec2::new(x, y + s)]
    }

    fn covered(mask: &CoverageMask) -> usize {
        mask.data.iter().filter(|c| **c >= 1.0).count()
    }

    #[test]
    fn aliased_square_covers_exact_pixels() {
        let clip = Size::new(16, 16);
        let pts = square(2.0, 3.0, 4.0);
        let mut mask = CoverageMask::covering(Rect::bounding(&pts).unwrap(), clip).unwrap();
        mask.add_polygon(&pts, false);
        assert_eq!(covered(&mask), 16);
    }

    #[test]
    fn antialiased_half_pixel_edge_is_partial() {
        let clip = Size::new(16, 16);
        let pts = square(2.5, 2.0, 4.0);
        let mut mask = CoverageMask::covering(Rect::bounding(&pts).unwrap(), clip).unwrap();
        mask.add_polygon(&pts, true);

        let lx = (2 - mask.x0) as usize;
        let ly = (3 - mask.y0) as usize;
        let edge = mask.data[ly * mask.width as usize + lx];
        assert!((edge - 0.5).abs() < 1e-4);
    }

    #[test]
    fn even_odd_leaves_hole() {
        let clip = Size::new(32, 32);
        // Outer square then inner square, joined into one ring.
        let mut pts = square(0.0, 0.0, 10.0);
        pts.push(Vec2::new(0.0, 0.0));
        pts.extend([
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0, 7.0),
            Vec2::new(7.0, 7.0),
            Vec2::new(7.0, 3.0),
            Vec2::new(3.0, 3.0),
        ]);
        let mut mask = CoverageMask::covering(Rect::bounding(&pts).unwrap(), clip).unwrap();
        mask.add_polygon(&pts, false);

        let at = |x: u32, y: u32| mask.data[((y - mask.y0) * mask.width + (x - mask.x0)) as usize];
        assert_eq!(at(1, 1), 1.0);
        assert_eq!(at(5, 5), 0.0);
    }

    #[test]
    fn offscreen_polygon_has_no_mask() {
        let pts = square(100.0, 100.0, 4.0);
        assert!(CoverageMask::covering(Rect::bounding(&pts).unwrap(), Size::new(8, 8)).is_none());
    }
}
