//! The draw-call surface handed to `App::render`.
//!
//! A `Batch` is a stateful binder: the bound spritesheet and sprite, draw
//! color, clear color, stroke width and transform all persist between calls
//! and between frames, until the canvas rebuilds its buffers. Draw calls
//! rasterize immediately.

mod batch;
mod state;

pub use batch::Batch;
pub use state::BatchId;

pub(crate) use state::BatchState;
