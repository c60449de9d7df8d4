//! Recoverable error categories.
//!
//! Configuration and resource failures are ordinary values. Anything that
//! escapes the run loop is wrapped in `anyhow::Error` and handled by
//! [`crate::fatal`].

use crate::hints::{HintKey, HintValue};

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("pixel size {requested} out of range 1..={max}")]
    PixelSize { requested: u32, max: u32 },
    #[error("frame rate {0} out of range 1..=999")]
    FrameRate(u32),
    #[error("window size {width}x{height} must be non-zero")]
    WindowSize { width: u32, height: u32 },
    #[error("hint value {value} is not valid for {key}")]
    InvalidHint { key: HintKey, value: HintValue },
    #[error("unknown hint {0:?}")]
    UnknownHint(String),
}

/// Spritesheet registration failures.
#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("spritesheet name must not be empty")]
    EmptyName,
    #[error("spritesheet {0:?} is already registered")]
    Duplicate(String),
    #[error("spritesheet {0:?} has an empty image")]
    EmptyImage(String),
    #[error("spritesheet {name:?} has a zero cell size ({width}x{height})")]
    ZeroCell { name: String, width: u32, height: u32 },
    #[error("failed to decode spritesheet {name:?}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
}

/// Polygon model store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("model name must not be empty")]
    EmptyName,
    #[error("model {0:?} is already stored")]
    Duplicate(String),
    #[error("model {0:?} does not exist")]
    Missing(String),
}

/// Animation construction and selection failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimationError {
    #[error("animation has no frames")]
    NoFrames,
    #[error("frame index {index} out of range for {len} frames")]
    FrameOutOfRange { index: usize, len: usize },
    #[error("animation group is empty")]
    EmptyGroup,
    #[error("animation index {index} out of range for {len} animations")]
    AnimationOutOfRange { index: usize, len: usize },
}

/// Font registry failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontError {
    #[error("font parse error: {0}")]
    Parse(String),
}

/// Run loop state transition failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoopError {
    #[error("run loop is already running")]
    AlreadyRunning,
}
