/// Image sampling filter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Nearest,
    Bilinear,
}

/// Resolved rasterizer switches, produced by [`crate::hints::HintSet::resolve`].
///
/// The default value is the fast configuration every canvas starts with.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RasterSettings {
    /// Filter for sprites drawn at non-native size and for the pixel upscale.
    pub interpolation: Interpolation,
    /// Supersampled edge coverage for shapes.
    pub antialias: bool,
    /// Glyph coverage instead of thresholded glyph masks.
    pub text_antialias: bool,
    /// Snap stroke geometry to pixel centers.
    pub stroke_normalize: bool,
    /// Keep sub-pixel glyph positions.
    pub fractional_metrics: bool,
    /// Blend in linear light rather than on sRGB bytes.
    pub linear_blend: bool,
    /// Ordered dithering on partially covered writes.
    pub dithering: bool,
    /// Denser curve tessellation.
    pub high_quality: bool,
    /// Composite every sprite alpha level instead of snapping near-opaque
    /// and near-transparent texels.
    pub precise_alpha: bool,
}
