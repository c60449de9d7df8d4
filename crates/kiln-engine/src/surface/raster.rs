use image::RgbaImage;

use crate::coords::{Affine, Rect, Vec2};
use crate::paint::Color;

use super::blend::{blend_pixel, rgb};
use super::buffer::sample_bilinear;
use super::mask::CoverageMask;
use super::{Interpolation, PixelBuffer, RasterSettings};

/// Immediate-mode drawing into a [`PixelBuffer`].
///
/// All geometry is given in user space and mapped through `transform`.
pub struct Raster<'a> {
    target: &'a mut PixelBuffer,
    settings: &'a RasterSettings,
    transform: Affine,
}

impl<'a> Raster<'a> {
    pub fn new(target: &'a mut PixelBuffer, settings: &'a RasterSettings, transform: Affine) -> Self {
        Self { target, settings, transform }
    }

    /// Fills `points` as a closed even-odd polygon.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let device: Vec<Vec2> = points.iter().map(|p| self.transform.apply(*p)).collect();
        let Some(bounds) = Rect::bounding(&device) else {
            return;
        };
        let Some(mut mask) = CoverageMask::covering(bounds, self.target.size()) else {
            return;
        };
        mask.add_polygon(&device, self.settings.antialias);
        self.composite(&mask, color);
    }

    /// Strokes the polyline through `points` with square caps.
    pub fn stroke_path(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color) {
        if points.is_empty() {
            return;
        }

        let scale = self.transform.mean_scale();
        let normalize = self.settings.stroke_normalize;
        let mut device: Vec<Vec2> = points
            .iter()
            .map(|p| {
                let d = self.transform.apply(*p);
                if normalize { Vec2::new(d.x.floor() + 0.5, d.y.floor() + 0.5) } else { d }
            })
            .collect();
        if closed && device.len() > 2 {
            device.push(device[0]);
        }

        let device_width = width.max(0.0) * scale;
        let thin = device_width <= 1.0;
        let half = device_width.max(1.0) * 0.5;

        let Some(bounds) = Rect::bounding(&device) else {
            return;
        };
        let Some(mut mask) = CoverageMask::covering(bounds.inflated(half), self.target.size()) else {
            return;
        };

        if thin && !self.settings.antialias {
            if device.len() == 1 {
                mask.plot(device[0].x.floor() as i64, device[0].y.floor() as i64);
            }
            let (lo, hi) = mask.device_bounds();
            for seg in device.windows(2) {
                // A pixel of margin keeps the stepping of clipped lines close
                // to that of the full line.
                let margin = Vec2::new(1.0, 1.0);
                if let Some((p, q)) = clip_segment(seg[0], seg[1], lo - margin, hi + margin) {
                    bresenham(&mut mask, p, q);
                }
            }
        } else {
            if device.len() == 1 {
                device.push(device[0]);
            }
            for seg in device.windows(2) {
                mask.add_polygon(&segment_quad(seg[0], seg[1], half), self.settings.antialias);
            }
        }

        self.composite(&mask, color);
    }

    /// Draws `image` stretched over the user-space rectangle `dst`.
    pub fn draw_image(&mut self, image: &RgbaImage, dst: Rect) {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || dst.is_empty() {
            return;
        }

        let mut local = Affine::IDENTITY;
        local.translate(dst.origin.x, dst.origin.y);
        local.scale(dst.size.x / iw as f32, dst.size.y / ih as f32);

        let src = image.as_raw();
        let filter = self.settings.interpolation;
        let precise = self.settings.precise_alpha;

        self.map_source(iw, ih, local, |u, v| {
            let texel = match filter {
                Interpolation::Nearest => {
                    let i = ((v as u32).min(ih - 1) * iw + (u as u32).min(iw - 1)) as usize * 4;
                    [
                        f32::from(src[i]),
                        f32::from(src[i + 1]),
                        f32::from(src[i + 2]),
                        f32::from(src[i + 3]),
                    ]
                }
                Interpolation::Bilinear => sample_bilinear(src, iw, ih, u - 0.5, v - 0.5),
            };
            let mut alpha = texel[3] / 255.0;
            if !precise {
                alpha = snap_alpha(alpha);
            }
            Some(([texel[0] / 255.0, texel[1] / 255.0, texel[2] / 255.0], alpha))
        });
    }

    /// Draws an 8-bit coverage mask (a rasterized glyph) at user-space
    /// `origin` in `color`. With `threshold`, coverage is binarized at 50%.
    pub fn draw_mask(
        &mut self,
        coverage: &[u8],
        width: u32,
        height: u32,
        origin: Vec2,
        color: Color,
        threshold: bool,
    ) {
        if width == 0 || height == 0 || coverage.len() < (width * height) as usize {
            return;
        }

        let mut local = Affine::IDENTITY;
        local.translate(origin.x, origin.y);

        let src = rgb(color);
        self.map_source(width, height, local, |u, v| {
            let i = ((v as u32).min(height - 1) * width + (u as u32).min(width - 1)) as usize;
            let mut c = f32::from(coverage[i]) / 255.0;
            if threshold {
                c = if c >= 0.5 { 1.0 } else { 0.0 };
            }
            Some((src, c * color.a))
        });
    }

    /// Visits every device pixel whose center maps inside a `w x h` source
    /// placed by `local` (then `transform`), blending what `sample` returns.
    fn map_source<F>(&mut self, w: u32, h: u32, local: Affine, mut sample: F)
    where
        F: FnMut(f32, f32) -> Option<([f32; 3], f32)>,
    {
        let full = self.transform.then_before(&local);
        let Some(inverse) = full.inverse() else {
            return;
        };

        let (wf, hf) = (w as f32, h as f32);
        let corners = [
            full.apply(Vec2::new(0.0, 0.0)),
            full.apply(Vec2::new(wf, 0.0)),
            full.apply(Vec2::new(wf, hf)),
            full.apply(Vec2::new(0.0, hf)),
        ];
        let Some(bounds) = Rect::bounding(&corners) else {
            return;
        };
        let Some((x0, y0, x1, y1)) = bounds.pixel_span(self.target.size()) else {
            return;
        };

        let stride = self.target.width() as usize * 4;
        let settings = *self.settings;
        let bytes = self.target.bytes_mut();

        for py in y0..y1 {
            for px in x0..x1 {
                let s = inverse.apply(Vec2::new(px as f32 + 0.5, py as f32 + 0.5));
                if s.x < 0.0 || s.y < 0.0 || s.x >= wf || s.y >= hf {
                    continue;
                }
                let Some((color, alpha)) = sample(s.x, s.y) else {
                    continue;
                };
                let i = py as usize * stride + px as usize * 4;
                blend_pixel(&mut bytes[i..i + 4], color, alpha, &settings, px, py);
            }
        }
    }

    fn composite(&mut self, mask: &CoverageMask, color: Color) {
        let src = rgb(color);
        let stride = self.target.width() as usize * 4;
        let settings = *self.settings;
        let bytes = self.target.bytes_mut();

        for ly in 0..mask.height {
            for lx in 0..mask.width {
                let c = mask.data[(ly * mask.width + lx) as usize];
                if c <= 0.0 {
                    continue;
                }
                let (x, y) = (mask.x0 + lx, mask.y0 + ly);
                let i = y as usize * stride + x as usize * 4;
                blend_pixel(&mut bytes[i..i + 4], src, c * color.a, &settings, x, y);
            }
        }
    }
}

/// Fast alpha: nearly opaque texels are copied, nearly clear ones skipped.
#[inline]
fn snap_alpha(a: f32) -> f32 {
    if a >= 0.97 {
        1.0
    } else if a <= 0.03 {
        0.0
    } else {
        a
    }
}

/// Quad covering the segment `p..q` widened by `half` on each side, with
/// square caps.
fn segment_quad(p: Vec2, q: Vec2, half: f32) -> [Vec2; 4] {
    let dir = (q - p).normalized();
    let (dir, normal) = if dir == Vec2::zero() {
        (Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0))
    } else {
        (dir, dir.perp())
    };
    let a = p - dir * half;
    let b = q + dir * half;
    [a + normal * half, b + normal * half, b - normal * half, a - normal * half]
}

/// Liang-Barsky clip of the segment `p..q` to the box `lo..hi`. `None` when
/// the segment misses the box entirely.
fn clip_segment(p: Vec2, q: Vec2, lo: Vec2, hi: Vec2) -> Option<(Vec2, Vec2)> {
    let (px, py) = (f64::from(p.x), f64::from(p.y));
    let (dx, dy) = (f64::from(q.x) - px, f64::from(q.y) - py);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    let edges = [
        (-dx, px - f64::from(lo.x)),
        (dx, f64::from(hi.x) - px),
        (-dy, py - f64::from(lo.y)),
        (dy, f64::from(hi.y) - py),
    ];
    for (step, dist) in edges {
        if step == 0.0 {
            if dist < 0.0 {
                return None;
            }
            continue;
        }
        let t = dist / step;
        if step < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| Vec2::new((px + dx * t) as f32, (py + dy * t) as f32);
    Some((at(t0), at(t1)))
}

/// One-pixel line through the pixels containing `p` and `q`, both included.
/// Callers clip first; the step count is bounded by the endpoint distance.
fn bresenham(mask: &mut CoverageMask, p: Vec2, q: Vec2) {
    let (mut x0, mut y0) = (p.x.floor() as i64, p.y.floor() as i64);
    let (x1, y1) = (q.x.floor() as i64, q.y.floor() as i64);

    let dx = x1.saturating_sub(x0).saturating_abs();
    let dy = -y1.saturating_sub(y0).saturating_abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx.saturating_add(dy);

    loop {
        mask.plot(x0, y0);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = err.saturating_mul(2);
        if e2 >= dy {
            err = err.saturating_add(dy);
            x0 += sx;
        }
        if e2 <= dx {
            err = err.saturating_add(dx);
            y0 += sy;
        }
    }
}
