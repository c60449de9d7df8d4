//! Double-buffered, optionally pixel-scaled drawing target.
//!
//! The canvas draws into a device-sized back buffer, or, when the pixel size
//! is above 1, into a low-resolution logical buffer that `present` stretches
//! over the back buffer. The finished back buffer is handed to a
//! [`BufferStrategy`] for display.

mod canvas;
mod strategy;

pub use canvas::{max_pixel_size, Canvas};
pub use strategy::{BufferStrategy, Headless};
