//! Per-pixel compositing.

use crate::paint::Color;

use super::RasterSettings;

const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

#[inline]
fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 { v / 12.92 } else { ((v + 0.055) / 1.055).powf(2.4) }
}

#[inline]
fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.003_130_8 { v * 12.92 } else { 1.055 * v.powf(1.0 / 2.4) - 0.055 }
}

/// Composites `src` with coverage `alpha` onto the RGB pixel `dst`.
///
/// `x`/`y` are only used to pick the dither threshold.
#[inline]
pub(crate) fn blend_pixel(
    dst: &mut [u8],
    src: [f32; 3],
    alpha: f32,
    settings: &RasterSettings,
    x: u32,
    y: u32,
) {
    if alpha <= 0.0 {
        return;
    }
    if alpha >= 1.0 {
        for i in 0..3 {
            dst[i] = (src[i].clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        }
        dst[3] = 255;
        return;
    }

    let bias = if settings.dithering {
        (f32::from(BAYER_4X4[(y & 3) as usize][(x & 3) as usize]) + 0.5) / 16.0
    } else {
        0.5
    };

    for i in 0..3 {
        let d = f32::from(dst[i]) / 255.0;
        let out = if settings.linear_blend {
            let l = srgb_to_linear(d) + (srgb_to_linear(src[i]) - srgb_to_linear(d)) * alpha;
            linear_to_srgb(l)
        } else {
            d + (src[i] - d) * alpha
        };
        dst[i] = (out.clamp(0.0, 1.0) * 255.0 + bias).min(255.0) as u8;
    }
    dst[3] = 255;
}

#[inline]
pub(crate) fn rgb(color: Color) -> [f32; 3] {
    [color.r, color.g, color.b]
}
