use std::collections::HashMap;
use std::sync::Arc;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::error::FontError;

use super::Font;

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Size of a laid-out string, in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    /// Line height (ascent + descent + gap).
    pub height: f32,
    pub ascent: f32,
    /// Positive distance below the baseline.
    pub descent: f32,
}

/// Glyph bitmap placed relative to the top-left of the text line.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
    pub coverage: Arc<Vec<u8>>,
}

/// Owns loaded fonts and a cache of rasterized glyphs.
///
/// Fonts are immutable after loading. Glyph bitmaps are rasterized on first
/// use and kept for the lifetime of the system.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
    glyphs: HashMap<GlyphRasterConfig, Arc<Vec<u8>>>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new(), glyphs: HashMap::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {id:?}");
        Ok(id)
    }

    #[inline]
    pub fn contains(&self, id: FontId) -> bool {
        id.0 < self.fonts.len()
    }

    fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Line and advance metrics for `text`, or `None` for an unknown font.
    pub fn measure(&self, text: &str, font: &Font) -> Option<TextMetrics> {
        let f = self.get(font.id)?;
        let (ascent, descent, gap) = line_metrics(f, font.size);

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[f], &TextStyle::new(text, font.size, 0));

        // Pen position after each glyph, not the bitmap edge.
        let width = layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = f.metrics_indexed(g.key.glyph_index, font.size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);

        Some(TextMetrics { width, height: ascent + descent + gap, ascent, descent })
    }

    /// Lays out `text` and returns its glyph bitmaps. With `fractional` off,
    /// glyph origins are rounded to whole pixels.
    pub fn shape(&mut self, text: &str, font: &Font, fractional: bool) -> Option<Vec<Glyph>> {
        let f = self.fonts.get(font.id.0)?;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[f], &TextStyle::new(text, font.size, 0));

        let mut out = Vec::with_capacity(layout.glyphs().len());
        for g in layout.glyphs() {
            if g.width == 0 || g.height == 0 {
                continue;
            }
            let coverage = Arc::clone(
                self.glyphs
                    .entry(g.key)
                    .or_insert_with(|| Arc::new(f.rasterize_config(g.key).1)),
            );
            let (x, y) = if fractional { (g.x, g.y) } else { (g.x.round(), g.y.round()) };
            out.push(Glyph { x, y, width: g.width as u32, height: g.height as u32, coverage });
        }
        Some(out)
    }

    #[inline]
    pub fn cached_glyphs(&self) -> usize {
        self.glyphs.len()
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn line_metrics(font: &fontdue::Font, size: f32) -> (f32, f32, f32) {
    match font.horizontal_line_metrics(size) {
        Some(m) => (m.ascent, -m.descent, m.line_gap),
        None => (size, size * 0.2, 0.0),
    }
}

/// Reads the first common sans-serif font found on the system.
pub fn find_system_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Option<(FontSystem, Font)> {
        let bytes = find_system_font()?;
        let mut fonts = FontSystem::new();
        let id = fonts.load_font(&bytes).ok()?;
        Some((fonts, Font::new(id, 16.0)))
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(matches!(fonts.load_font(b"not a font"), Err(FontError::Parse(_))));
    }

    #[test]
    fn unknown_font_measures_as_none() {
        let fonts = FontSystem::new();
        assert!(fonts.measure("hi", &Font::new(FontId(3), 12.0)).is_none());
    }

    #[test]
    fn longer_text_measures_wider() {
        let Some((fonts, font)) = loaded() else {
            return;
        };
        let short = fonts.measure("ab", &font).unwrap();
        let long = fonts.measure("abcdef", &font).unwrap();
        assert!(long.width > short.width);
        assert!(short.ascent > 0.0);
        assert!(short.height >= short.ascent);
    }

    #[test]
    fn shaping_caches_glyphs() {
        let Some((mut fonts, font)) = loaded() else {
            return;
        };
        let glyphs = fonts.shape("aaa", &font, false).unwrap();
        assert_eq!(glyphs.len(), 3);
        assert_eq!(fonts.cached_glyphs(), 1);
        assert!(glyphs.iter().all(|g| g.x.fract() == 0.0));
    }
}
