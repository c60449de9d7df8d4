//! Software drawing surface.
//!
//! `PixelBuffer` is an opaque RGB image (alpha forced to 255). `Raster`
//! draws into it through an affine transform, honoring the resolved
//! [`RasterSettings`].

mod blend;
mod buffer;
mod mask;
mod raster;
mod settings;
pub mod shapes;

pub use buffer::PixelBuffer;
pub use raster::Raster;
pub use settings::{Interpolation, RasterSettings};
