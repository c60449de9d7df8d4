use crate::error::ConfigError;
use crate::time::{MAX_RATE, MIN_RATE};

/// Startup parameters for [`Runtime::run`](crate::window::Runtime::run) and
/// [`RunLoop::new`](crate::runloop::RunLoop::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub title: String,
    /// Initial window width in physical pixels.
    pub width: u32,
    /// Initial window height in physical pixels.
    pub height: u32,
    pub pixel_size: u32,
    /// Update and frame rate in Hz, `1..=999`.
    pub target_fps: u32,
    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,
    /// Skip the sleep between passes.
    pub unlimited_fps: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            width: 1280,
            height: 720,
            pixel_size: 1,
            target_fps: 60,
            fullscreen: false,
            unlimited_fps: false,
        }
    }
}

impl EngineConfig {
    /// Checks every field that has a range. The pixel size is only checked
    /// for `>= 1` here; its upper bound depends on the final window size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RATE..=MAX_RATE).contains(&self.target_fps) {
            return Err(ConfigError::FrameRate(self.target_fps));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::WindowSize { width: self.width, height: self.height });
        }
        if self.pixel_size == 0 {
            return Err(ConfigError::PixelSize { requested: 0, max: 0 });
        }
        Ok(())
    }
}
