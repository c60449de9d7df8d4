use std::sync::Arc;

use crate::coords::{Affine, Rect, Vec2};
use crate::core::Assets;
use crate::error::ModelError;
use crate::paint::Color;
use crate::sprite::Sprite;
use crate::surface::{shapes, PixelBuffer, Raster, RasterSettings};
use crate::text::{Font, FontStyle, TextMetrics};

use super::{BatchId, BatchState};

/// Stateful immediate-mode drawing interface for the active canvas buffer.
///
/// Coordinates are logical canvas pixels, mapped through the current
/// transform. Out-of-range colors are clamped, never rejected.
pub struct Batch<'a> {
    state: &'a mut BatchState,
    target: &'a mut PixelBuffer,
    settings: &'a RasterSettings,
    assets: &'a mut Assets,
}

impl<'a> Batch<'a> {
    pub(crate) fn new(
        state: &'a mut BatchState,
        target: &'a mut PixelBuffer,
        settings: &'a RasterSettings,
        assets: &'a mut Assets,
    ) -> Self {
        Self { state, target, settings, assets }
    }

    #[inline]
    pub fn id(&self) -> BatchId {
        self.state.id
    }

    /// Logical canvas width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.state.size.width
    }

    /// Logical canvas height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.state.size.height
    }

    #[inline]
    pub fn assets(&mut self) -> &mut Assets {
        &mut *self.assets
    }

    #[inline]
    fn raster(&mut self) -> Raster<'_> {
        Raster::new(&mut *self.target, self.settings, self.state.transform)
    }

    // ── binding ───────────────────────────────────────────────────────────

    /// Binds `name` as the current spritesheet. An unregistered name is
    /// logged and leaves no sheet bound.
    pub fn bind_spritesheet(&mut self, name: &str) {
        if self.state.spritesheet.as_deref() == Some(name) {
            return;
        }
        if self.assets.sprites.contains_sheet(name) {
            self.state.spritesheet = Some(Arc::from(name));
        } else {
            log::warn!("cannot bind unknown spritesheet {name:?}");
            self.state.spritesheet = None;
        }
    }

    pub fn unbind_spritesheet(&mut self) {
        self.state.spritesheet = None;
    }

    #[inline]
    pub fn bound_spritesheet(&self) -> Option<&str> {
        self.state.spritesheet.as_deref()
    }

    /// Binds grid cell `(cx, cy)` of the bound sheet. No-op without a bound
    /// sheet; a cell outside the sheet leaves no sprite bound.
    pub fn bind_sprite(&mut self, cx: i32, cy: i32) {
        let Some(sheet) = self.state.spritesheet.clone() else {
            return;
        };
        self.bind_sprite_from(&sheet, cx, cy);
    }

    /// Binds grid cell `(cx, cy)` of `sheet` without changing the bound
    /// sheet.
    pub fn bind_sprite_from(&mut self, sheet: &str, cx: i32, cy: i32) {
        self.state.sprite = self.assets.sprites.get_cell(sheet, cx, cy);
    }

    /// Binds a pixel rectangle of the bound sheet. Same rules as
    /// [`bind_sprite`](Self::bind_sprite).
    pub fn bind_sprite_region(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let Some(sheet) = self.state.spritesheet.clone() else {
            return;
        };
        self.bind_sprite_region_from(&sheet, x, y, width, height);
    }

    pub fn bind_sprite_region_from(&mut self, sheet: &str, x: i32, y: i32, width: i32, height: i32) {
        self.state.sprite = self.assets.sprites.get_region(sheet, x, y, width, height);
    }

    pub fn unbind_sprite(&mut self) {
        self.state.sprite = None;
    }

    #[inline]
    pub fn bound_sprite(&self) -> Option<&Arc<Sprite>> {
        self.state.sprite.as_ref()
    }

    // ── state ─────────────────────────────────────────────────────────────

    /// Sets the draw color from unit-range components.
    pub fn color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.color = Color::from_unit(r, g, b, a);
    }

    pub fn color_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.color(r, g, b, 1.0);
    }

    /// Sets the draw color from `0..=255` components.
    pub fn color_u8(&mut self, r: i32, g: i32, b: i32, a: i32) {
        self.state.color = Color::from_u8_clamped(r, g, b, a);
    }

    /// Sets the draw color from packed `0xAARRGGBB`.
    pub fn color_argb(&mut self, argb: u32) {
        self.state.color = Color::from_argb(argb);
    }

    pub fn set_color(&mut self, color: Color) {
        self.state.color = Color::from_unit(color.r, color.g, color.b, color.a);
    }

    #[inline]
    pub fn current_color(&self) -> Color {
        self.state.color
    }

    /// Sets the clear color from unit-range components. A translucent clear
    /// color blends over the previous contents.
    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.clear_color = Color::from_unit(r, g, b, a);
    }

    pub fn clear_color_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.clear_color(r, g, b, 1.0);
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.state.clear_color = Color::from_unit(color.r, color.g, color.b, color.a);
    }

    #[inline]
    pub fn current_clear_color(&self) -> Color {
        self.state.clear_color
    }

    /// Stroke width for outlines and lines. Negative widths become `0`,
    /// which still draws one-pixel lines.
    pub fn stroke(&mut self, width: f32) {
        self.state.stroke = if width.is_finite() { width.max(0.0) } else { 1.0 };
    }

    #[inline]
    pub fn stroke_width(&self) -> f32 {
        self.state.stroke
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform.translate(x, y);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform.scale(sx, sy);
    }

    /// Rotates by `angle` radians around `(x, y)`.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32) {
        self.state.transform.rotate_about(angle, x, y);
    }

    pub fn reset_transform(&mut self) {
        self.state.transform = Affine::IDENTITY;
    }

    #[inline]
    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Fills the whole logical surface with the clear color. The transform
    /// does not apply.
    pub fn clear_screen(&mut self) {
        let color = self.state.clear_color;
        if color.a >= 1.0 {
            self.target.fill(color);
            return;
        }
        let size = self.target.size();
        let pts = shapes::rect(0.0, 0.0, size.width as f32, size.height as f32);
        Raster::new(&mut *self.target, self.settings, Affine::IDENTITY).fill_polygon(&pts, color);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (color, stroke) = (self.state.color, self.state.stroke);
        self.raster()
            .stroke_path(&[Vec2::new(x1, y1), Vec2::new(x2, y2)], false, stroke, color);
    }

    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let pts = shapes::rect(x, y, w, h);
        self.outline(&pts);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let pts = shapes::rect(x, y, w, h);
        self.fill(&pts);
    }

    pub fn draw_oval(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let pts = shapes::ellipse(x, y, w, h, self.segments(w, h));
        self.outline(&pts);
    }

    pub fn fill_oval(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let pts = shapes::ellipse(x, y, w, h, self.segments(w, h));
        self.fill(&pts);
    }

    /// Rectangle outline with corner arcs of diameter `(arc_w, arc_h)`.
    pub fn draw_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, arc_w: f32, arc_h: f32) {
        let pts = shapes::round_rect(x, y, w, h, arc_w, arc_h, self.segments(arc_w, arc_h));
        self.outline(&pts);
    }

    pub fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, arc_w: f32, arc_h: f32) {
        let pts = shapes::round_rect(x, y, w, h, arc_w, arc_h, self.segments(arc_w, arc_h));
        self.fill(&pts);
    }

    /// Outlines the named model.
    pub fn draw_model(&mut self, name: &str) -> Result<(), ModelError> {
        let pts = self.assets.models.get(name)?.vertices().to_vec();
        self.outline(&pts);
        Ok(())
    }

    /// Fills the named model.
    pub fn fill_model(&mut self, name: &str) -> Result<(), ModelError> {
        let pts = self.assets.models.get(name)?.vertices().to_vec();
        self.fill(&pts);
        Ok(())
    }

    /// Draws the bound sprite at native size. No-op without a bound sprite.
    pub fn draw_sprite(&mut self, x: f32, y: f32) {
        let Some(sprite) = self.state.sprite.clone() else {
            return;
        };
        let (w, h) = (sprite.width() as f32, sprite.height() as f32);
        self.raster().draw_image(sprite.image(), Rect::new(x, y, w, h));
    }

    /// Draws the bound sprite stretched to `w x h`.
    pub fn draw_sprite_scaled(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let Some(sprite) = self.state.sprite.clone() else {
            return;
        };
        self.raster().draw_image(sprite.image(), Rect::new(x, y, w, h).normalized());
    }

    /// Draws `text` with its line box's top-left corner at `(x, y)`.
    ///
    /// Blank text is ignored. An unknown font is logged and skipped.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &Font) {
        if text.trim().is_empty() {
            return;
        }

        let fractional = self.settings.fractional_metrics;
        let threshold = !self.settings.text_antialias;
        let fonts = &mut self.assets.fonts;
        let (Some(metrics), Some(glyphs)) =
            (fonts.measure(text, font), fonts.shape(text, font, fractional))
        else {
            log::warn!("cannot draw text with unloaded font {:?}", font.id);
            return;
        };

        let color = self.state.color;
        let stroke = self.state.stroke;
        let mut raster = Raster::new(&mut *self.target, self.settings, self.state.transform);

        for g in &glyphs {
            raster.draw_mask(
                &g.coverage,
                g.width,
                g.height,
                Vec2::new(x + g.x, y + g.y),
                color,
                threshold,
            );
        }

        for line in decoration_lines(font.style, &metrics, x, y).into_iter().flatten() {
            raster.stroke_path(&line, false, stroke, color);
        }
    }

    fn outline(&mut self, pts: &[Vec2]) {
        let (color, stroke) = (self.state.color, self.state.stroke);
        self.raster().stroke_path(pts, true, stroke, color);
    }

    fn fill(&mut self, pts: &[Vec2]) {
        let color = self.state.color;
        self.raster().fill_polygon(pts, color);
    }

    fn segments(&self, w: f32, h: f32) -> usize {
        shapes::curve_segments(
            w * 0.5,
            h * 0.5,
            self.state.transform.mean_scale(),
            self.settings.high_quality,
        )
    }
}

/// Strikethrough and underline segments for a line of text whose box starts
/// at `(x, y)`. Strikethrough sits at three quarters of the ascent, the
/// underline at the bottom of the line box.
fn decoration_lines(
    style: FontStyle,
    metrics: &TextMetrics,
    x: f32,
    y: f32,
) -> [Option<[Vec2; 2]>; 2] {
    let right = x + metrics.width;
    let line = |at: f32| [Vec2::new(x, at), Vec2::new(right, at)];
    [
        style.strikethrough.then(|| line(y + metrics.ascent * 0.75)),
        style.underline.then(|| line(y + metrics.height)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Size;
    use crate::model::Model;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    struct Fixture {
        state: BatchState,
        target: PixelBuffer,
        settings: RasterSettings,
        assets: Assets,
    }

    impl Fixture {
        fn new(w: u32, h: u32) -> Self {
            let mut assets = Assets::new();
            let sheet = image::RgbaImage::from_fn(32, 16, |x, _| {
                if x < 16 { image::Rgba([255, 0, 0, 255]) } else { image::Rgba([0, 255, 0, 255]) }
            });
            assets.sprites.register_sheet("sheet", sheet, 16, 16).unwrap();
            assets.models.insert("tri", Model::new().vertex(0.0, 0.0).vertex(8.0, 0.0).vertex(0.0, 8.0)).unwrap();
            Self {
                state: BatchState::new(BatchId(1), Size::new(w, h)),
                target: PixelBuffer::new(Size::new(w, h)),
                settings: RasterSettings::default(),
                assets,
            }
        }

        fn batch(&mut self) -> Batch<'_> {
            Batch::new(&mut self.state, &mut self.target, &self.settings, &mut self.assets)
        }
    }

    // ── binding ───────────────────────────────────────────────────────────

    #[test]
    fn bind_sprite_without_sheet_is_noop() {
        let mut fx = Fixture::new(8, 8);
        let mut batch = fx.batch();
        batch.bind_sprite(0, 0);
        assert!(batch.bound_sprite().is_none());
    }

    #[test]
    fn explicit_sheet_binding_leaves_bound_sheet_alone() {
        let mut fx = Fixture::new(8, 8);
        let mut batch = fx.batch();
        batch.bind_sprite_from("sheet", 1, 0);
        assert!(batch.bound_spritesheet().is_none());
        assert_eq!(batch.bound_sprite().unwrap().region().x, 16);

        batch.bind_sprite_region_from("sheet", 4, 4, 40, 4);
        assert!(batch.bound_sprite().is_none());
    }

    #[test]
    fn unknown_sheet_is_not_bound() {
        let mut fx = Fixture::new(8, 8);
        let mut batch = fx.batch();
        batch.bind_spritesheet("nope");
        assert_eq!(batch.bound_spritesheet(), None);
    }

    #[test]
    fn out_of_bounds_cell_clears_bound_sprite() {
        let mut fx = Fixture::new(8, 8);
        let mut batch = fx.batch();
        batch.bind_spritesheet("sheet");
        batch.bind_sprite(1, 0);
        assert_eq!(batch.bound_sprite().unwrap().region().x, 16);
        batch.bind_sprite(2, 0);
        assert!(batch.bound_sprite().is_none());
    }

    #[test]
    fn unbinding_sheet_keeps_sprite() {
        let mut fx = Fixture::new(8, 8);
        let mut batch = fx.batch();
        batch.bind_spritesheet("sheet");
        batch.bind_sprite_region(0, 0, 4, 4);
        batch.unbind_spritesheet();
        assert!(batch.bound_sprite().is_some());
        batch.unbind_sprite();
        assert!(batch.bound_sprite().is_none());
    }

    // ── drawing ───────────────────────────────────────────────────────────

    #[test]
    fn draw_sprite_without_binding_draws_nothing() {
        let mut fx = Fixture::new(8, 8);
        fx.batch().draw_sprite(0.0, 0.0);
        assert!(fx.target.as_bytes().chunks_exact(4).all(|p| p == BLACK));
    }

    #[test]
    fn draw_sprite_copies_cell() {
        let mut fx = Fixture::new(32, 32);
        let mut batch = fx.batch();
        batch.bind_spritesheet("sheet");
        batch.bind_sprite(1, 0);
        batch.draw_sprite(4.0, 4.0);
        assert_eq!(fx.target.pixel(4, 4), Some([0, 255, 0, 255]));
        assert_eq!(fx.target.pixel(19, 19), Some([0, 255, 0, 255]));
        assert_eq!(fx.target.pixel(20, 20), Some(BLACK));
    }

    #[test]
    fn draw_sprite_scaled_stretches() {
        let mut fx = Fixture::new(32, 32);
        let mut batch = fx.batch();
        batch.bind_spritesheet("sheet");
        batch.bind_sprite(0, 0);
        batch.draw_sprite_scaled(0.0, 0.0, 4.0, 2.0);
        assert_eq!(fx.target.pixel(3, 1), Some([255, 0, 0, 255]));
        assert_eq!(fx.target.pixel(4, 1), Some(BLACK));
    }

    #[test]
    fn clear_screen_uses_clear_color_and_ignores_transform() {
        let mut fx = Fixture::new(4, 4);
        let mut batch = fx.batch();
        batch.translate(100.0, 100.0);
        batch.clear_color_rgb(1.0, 1.0, 1.0);
        batch.clear_screen();
        assert!(fx.target.as_bytes().chunks_exact(4).all(|p| p == WHITE));
    }

    #[test]
    fn clear_color_keeps_clamped_alpha() {
        let mut fx = Fixture::new(4, 4);
        let mut batch = fx.batch();
        batch.clear_color(0.2, 1.5, -1.0, 0.25);
        assert_eq!(batch.current_clear_color(), Color::from_unit(0.2, 1.0, 0.0, 0.25));
        batch.clear_color(0.0, 0.0, 0.0, 7.0);
        assert_eq!(batch.current_clear_color().a, 1.0);
    }

    #[test]
    fn translucent_clear_blends_over_previous_frame() {
        let mut fx = Fixture::new(4, 4);
        let mut batch = fx.batch();
        batch.clear_color(1.0, 1.0, 1.0, 0.5);
        batch.clear_screen();
        let px = fx.target.pixel(2, 2).unwrap();
        assert!(px[0] > 64 && px[0] < 255, "{px:?}");
        assert!(fx.target.as_bytes().chunks_exact(4).all(|p| p == px));
    }

    #[test]
    fn colors_are_clamped() {
        let mut fx = Fixture::new(4, 4);
        let mut batch = fx.batch();
        batch.color(2.0, -1.0, 0.5, 9.0);
        assert_eq!(batch.current_color(), Color::from_unit(1.0, 0.0, 0.5, 1.0));
        batch.color_u8(999, -3, 128, 255);
        assert_eq!(batch.current_color().to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn fill_rect_respects_translation() {
        let mut fx = Fixture::new(16, 16);
        let mut batch = fx.batch();
        batch.translate(5.0, 5.0);
        batch.fill_rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(fx.target.pixel(5, 5), Some(WHITE));
        assert_eq!(fx.target.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn fill_oval_covers_center_not_corner() {
        let mut fx = Fixture::new(16, 16);
        fx.batch().fill_oval(0.0, 0.0, 16.0, 16.0);
        assert_eq!(fx.target.pixel(8, 8), Some(WHITE));
        assert_eq!(fx.target.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn round_rect_corner_is_cut() {
        let mut fx = Fixture::new(32, 32);
        fx.batch().fill_round_rect(0.0, 0.0, 32.0, 32.0, 16.0, 16.0);
        assert_eq!(fx.target.pixel(0, 0), Some(BLACK));
        assert_eq!(fx.target.pixel(16, 0), Some(WHITE));
    }

    #[test]
    fn draw_line_and_outline() {
        let mut fx = Fixture::new(16, 16);
        let mut batch = fx.batch();
        batch.draw_line(0.0, 0.0, 15.0, 15.0);
        batch.draw_rect(2.0, 10.0, 3.0, 3.0);
        assert_eq!(fx.target.pixel(7, 7), Some(WHITE));
        assert_eq!(fx.target.pixel(2, 10), Some(WHITE));
        assert_eq!(fx.target.pixel(3, 11), Some(BLACK));
    }

    #[test]
    fn models_are_drawn_by_name() {
        let mut fx = Fixture::new(16, 16);
        let mut batch = fx.batch();
        batch.fill_model("tri").unwrap();
        assert_eq!(batch.draw_model("missing"), Err(ModelError::Missing("missing".into())));
        assert_eq!(fx.target.pixel(1, 1), Some(WHITE));
        assert_eq!(fx.target.pixel(7, 7), Some(BLACK));
    }

    #[test]
    fn blank_text_and_unknown_font_are_skipped() {
        let mut fx = Fixture::new(16, 16);
        let font = Font::new(crate::text::FontId(9), 12.0);
        let mut batch = fx.batch();
        batch.draw_text("   ", 0.0, 0.0, &font);
        batch.draw_text("hello", 0.0, 0.0, &font);
        assert!(fx.target.as_bytes().chunks_exact(4).all(|p| p == BLACK));
    }

    #[test]
    fn text_draws_pixels_when_a_font_is_available() {
        let Some(bytes) = crate::text::find_system_font() else {
            return;
        };
        let mut fx = Fixture::new(64, 32);
        let id = fx.assets.fonts.load_font(&bytes).unwrap();
        let font = Font::new(id, 16.0).underlined();
        fx.batch().draw_text("Hi", 2.0, 2.0, &font);
        assert!(fx.target.as_bytes().chunks_exact(4).any(|p| p == WHITE));
    }

    // ── text decorations ──────────────────────────────────────────────────

    fn line_metrics() -> TextMetrics {
        TextMetrics { width: 10.0, height: 12.0, ascent: 8.0, descent: 3.0 }
    }

    fn white_columns(target: &PixelBuffer, row: u32) -> Vec<u32> {
        (0..target.width()).filter(|&x| target.pixel(x, row) == Some(WHITE)).collect()
    }

    #[test]
    fn decoration_rows_follow_metrics() {
        let style = FontStyle { underline: true, strikethrough: true };
        let [strike, under] = decoration_lines(style, &line_metrics(), 3.0, 2.0);
        assert_eq!(strike, Some([Vec2::new(3.0, 8.0), Vec2::new(13.0, 8.0)]));
        assert_eq!(under, Some([Vec2::new(3.0, 14.0), Vec2::new(13.0, 14.0)]));
        assert_eq!(decoration_lines(FontStyle::default(), &line_metrics(), 3.0, 2.0), [None, None]);
    }

    #[test]
    fn strikethrough_spans_text_width_at_three_quarter_ascent() {
        let mut fx = Fixture::new(32, 32);
        let style = FontStyle { strikethrough: true, ..FontStyle::default() };
        let mut batch = fx.batch();
        for line in decoration_lines(style, &line_metrics(), 3.0, 2.0).into_iter().flatten() {
            batch.draw_line(line[0].x, line[0].y, line[1].x, line[1].y);
        }
        assert_eq!(white_columns(&fx.target, 8), (3..=13).collect::<Vec<_>>());
        assert!(white_columns(&fx.target, 14).is_empty());
    }

    #[test]
    fn underline_spans_text_width_at_line_height() {
        let mut fx = Fixture::new(32, 32);
        let style = FontStyle { underline: true, ..FontStyle::default() };
        let mut batch = fx.batch();
        for line in decoration_lines(style, &line_metrics(), 3.0, 2.0).into_iter().flatten() {
            batch.draw_line(line[0].x, line[0].y, line[1].x, line[1].y);
        }
        assert_eq!(white_columns(&fx.target, 14), (3..=13).collect::<Vec<_>>());
        assert!(white_columns(&fx.target, 8).is_empty());
    }

    #[test]
    fn draw_line_to_huge_endpoint_is_clipped() {
        let mut fx = Fixture::new(16, 16);
        let mut batch = fx.batch();
        batch.draw_line(0.0, 0.0, 1.0e19, 0.0);
        batch.draw_line(0.0, 4.0, 2.0e8, 4.0);
        assert_eq!(white_columns(&fx.target, 0).len(), 16);
        assert_eq!(white_columns(&fx.target, 4).len(), 16);
    }

    #[test]
    fn stroke_rejects_non_finite() {
        let mut fx = Fixture::new(4, 4);
        let mut batch = fx.batch();
        batch.stroke(-3.0);
        assert_eq!(batch.stroke_width(), 0.0);
        batch.stroke(f32::NAN);
        assert_eq!(batch.stroke_width(), 1.0);
    }
}
