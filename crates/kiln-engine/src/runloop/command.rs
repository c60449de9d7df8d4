use crate::coords::Size;
use crate::hints::{HintKey, HintValue};

/// Configuration intent applied by the loop thread at the top of a pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change the canvas pixel size. Rejected values are logged and dropped.
    SetPixelSize(u32),
    SetHint(HintKey, HintValue),
    /// The host surface changed size, in device pixels.
    Resize(Size),
    /// Recreate canvas buffers before the next render.
    Invalidate,
    /// The host became visible or hidden.
    SetShowing(bool),
}
