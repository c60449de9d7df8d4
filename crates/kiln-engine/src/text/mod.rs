//! Font registry and glyph rasterization for `Batch::draw_text`.

mod font;
mod font_system;

pub use font::{Font, FontStyle};
pub use font_system::{find_system_font, FontId, FontSystem, Glyph, TextMetrics};
