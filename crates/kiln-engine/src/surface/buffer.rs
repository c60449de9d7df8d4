use image::RgbaImage;

use crate::coords::Size;
use crate::paint::Color;

use super::Interpolation;

/// Opaque RGB pixel surface.
///
/// Backed by an RGBA8 image whose alpha channel is kept at 255 so the bytes
/// can be uploaded to an `Rgba8Unorm*` texture as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Allocates a black surface.
    pub fn new(size: Size) -> Self {
        Self { image: RgbaImage::from_pixel(size.width, size.height, image::Rgba([0, 0, 0, 255])) }
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major, tightly packed.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.image.get_pixel(x, y).0)
    }

    /// Overwrites every pixel with `color`, ignoring its alpha.
    pub fn fill(&mut self, color: Color) {
        let [r, g, b, _] = color.to_rgba8();
        for px in self.image.pixels_mut() {
            px.0 = [r, g, b, 255];
        }
    }

    /// Stretches `self` over all of `dst`.
    pub fn upscale_into(&self, dst: &mut PixelBuffer, filter: Interpolation) {
        let (sw, sh) = (self.width(), self.height());
        let (dw, dh) = (dst.width(), dst.height());
        if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
            return;
        }

        let src = self.image.as_raw();
        let sx = sw as f32 / dw as f32;
        let sy = sh as f32 / dh as f32;
        let stride = dw as usize * 4;

        for (dy, row) in dst.bytes_mut().chunks_exact_mut(stride).enumerate() {
            let v = (dy as f32 + 0.5) * sy;
            for dx in 0..dw as usize {
                let u = (dx as f32 + 0.5) * sx;
                let out = &mut row[dx * 4..dx * 4 + 4];
                match filter {
                    Interpolation::Nearest => {
                        let x = (u as u32).min(sw - 1) as usize;
                        let y = (v as u32).min(sh - 1) as usize;
                        let i = (y * sw as usize + x) * 4;
                        out.copy_from_slice(&src[i..i + 4]);
                    }
                    Interpolation::Bilinear => {
                        let texel = sample_bilinear(src, sw, sh, u - 0.5, v - 0.5);
                        for c in 0..3 {
                            out[c] = (texel[c] + 0.5) as u8;
                        }
                        out[3] = 255;
                    }
                }
            }
        }
    }
}

/// Bilinear sample of an RGBA8 image at texel-space `(u, v)` with edges
/// clamped. Channels are returned in `0.0..=255.0`.
pub(crate) fn sample_bilinear(src: &[u8], w: u32, h: u32, u: f32, v: f32) -> [f32; 4] {
    let u = u.clamp(0.0, (w - 1) as f32);
    let v = v.clamp(0.0, (h - 1) as f32);
    let (x0, y0) = (u.floor() as u32, v.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
    let (fx, fy) = (u - x0 as f32, v - y0 as f32);

    let at = |x: u32, y: u32, c: usize| f32::from(src[((y * w + x) * 4) as usize + c]);

    let mut out = [0.0; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = at(x0, y0, c) * (1.0 - fx) + at(x1, y0, c) * fx;
        let bottom = at(x0, y1, c) * (1.0 - fx) + at(x1, y1, c) * fx;
        *slot = top * (1.0 - fy) + bottom * fy;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_opaque_black() {
        let buf = PixelBuffer::new(Size::new(3, 2));
        assert_eq!(buf.pixel(2, 1), Some([0, 0, 0, 255]));
        assert_eq!(buf.pixel(3, 0), None);
        assert_eq!(buf.as_bytes().len(), 3 * 2 * 4);
    }

    #[test]
    fn fill_ignores_alpha() {
        let mut buf = PixelBuffer::new(Size::new(2, 2));
        buf.fill(Color::from_u8_clamped(10, 20, 30, 0));
        assert_eq!(buf.pixel(1, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn nearest_upscale_replicates_blocks() {
        let mut src = PixelBuffer::new(Size::new(2, 1));
        src.bytes_mut()[0..4].copy_from_slice(&[255, 0, 0, 255]);
        let mut dst = PixelBuffer::new(Size::new(8, 4));
        src.upscale_into(&mut dst, Interpolation::Nearest);

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(dst.pixel(x, y), Some([255, 0, 0, 255]));
            }
            for x in 4..8 {
                assert_eq!(dst.pixel(x, y), Some([0, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn bilinear_upscale_blends_across_the_seam() {
        let mut src = PixelBuffer::new(Size::new(2, 1));
        src.fill(Color::WHITE);
        src.bytes_mut()[0..4].copy_from_slice(&[0, 0, 0, 255]);
        let mut dst = PixelBuffer::new(Size::new(8, 1));
        src.upscale_into(&mut dst, Interpolation::Bilinear);

        let mid = dst.pixel(4, 0).unwrap()[0];
        assert!(mid > 0 && mid < 255);
        assert_eq!(dst.pixel(0, 0).unwrap()[0], 0);
        assert_eq!(dst.pixel(7, 0).unwrap()[0], 255);
    }
}
