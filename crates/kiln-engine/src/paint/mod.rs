//! Color model for the software surface.
//!
//! Colors are straight (non-premultiplied) sRGB in `[0, 1]`; the rasterizer
//! decides per hint whether blending happens in sRGB or linear light.

pub mod color;

pub use color::Color;
