//! Rendering hints.
//!
//! A validated key/value table of symbolic quality settings. The canvas
//! resolves the active table into [`RasterSettings`](crate::surface::RasterSettings)
//! whenever it rebuilds its buffers.

mod key;
mod set;

pub use key::{HintKey, HintValue};
pub use set::HintSet;
