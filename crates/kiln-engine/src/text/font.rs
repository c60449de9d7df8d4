use super::FontId;

/// Decoration flags applied when drawing text.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct FontStyle {
    pub underline: bool,
    pub strikethrough: bool,
}

/// A loaded font at a given pixel size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Font {
    pub id: FontId,
    pub size: f32,
    pub style: FontStyle,
}

impl Font {
    pub const DEFAULT_SIZE: f32 = 10.0;

    pub fn new(id: FontId, size: f32) -> Self {
        Self { id, size, style: FontStyle::default() }
    }

    #[must_use]
    pub fn sized(self, size: f32) -> Self {
        Self { size, ..self }
    }

    #[must_use]
    pub fn underlined(mut self) -> Self {
        self.style.underline = true;
        self
    }

    #[must_use]
    pub fn struck(mut self) -> Self {
        self.style.strikethrough = true;
        self
    }
}
