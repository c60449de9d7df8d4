use crate::canvas::max_pixel_size;
use crate::coords::Size;
use crate::error::ConfigError;
use crate::hints::{HintKey, HintValue};
use crate::runloop::{Command, LoopStats};

use super::Assets;

/// State the application can reach from `init` and `update`.
///
/// Configuration changes are validated here and applied by the loop before
/// the next `prepare`.
pub struct EngineCtx {
    pub assets: Assets,
    parent: Size,
    pixel_size: u32,
    stats: LoopStats,
    pending: Vec<Command>,
}

impl EngineCtx {
    pub fn new(parent: Size) -> Self {
        Self {
            assets: Assets::new(),
            parent,
            pixel_size: 1,
            stats: LoopStats::default(),
            pending: Vec::new(),
        }
    }

    /// Host size in device pixels as of the current pass.
    #[inline]
    pub fn parent_size(&self) -> Size {
        self.parent
    }

    /// Pixel size in effect for the current pass.
    #[inline]
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Counters from the last completed second.
    #[inline]
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn set_pixel_size(&mut self, pixel_size: u32) -> Result<(), ConfigError> {
        let max = max_pixel_size(self.parent, pixel_size.max(1));
        if pixel_size < 1 || pixel_size > max {
            return Err(ConfigError::PixelSize { requested: pixel_size, max });
        }
        self.pending.push(Command::SetPixelSize(pixel_size));
        Ok(())
    }

    pub fn set_hint(&mut self, key: HintKey, value: HintValue) -> Result<(), ConfigError> {
        if !key.accepts(value) {
            return Err(ConfigError::InvalidHint { key, value });
        }
        self.pending.push(Command::SetHint(key, value));
        Ok(())
    }

    /// Parses and sets a hint by name, e.g. `("interpolation", "bilinear")`.
    pub fn set_hint_named(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_hint(key.parse()?, value.parse()?)
    }

    /// Requests buffer recreation before the next render.
    pub fn invalidate(&mut self) {
        self.pending.push(Command::Invalidate);
    }

    pub(crate) fn sync(&mut self, parent: Size, pixel_size: u32, stats: LoopStats) {
        self.parent = parent;
        self.pixel_size = pixel_size;
        self.stats = stats;
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_is_checked_against_parent() {
        let mut ctx = EngineCtx::new(Size::new(1280, 720));
        assert!(ctx.set_pixel_size(11).is_err());
        assert!(ctx.set_pixel_size(0).is_err());
        ctx.set_pixel_size(4).unwrap();
        assert_eq!(ctx.take_pending(), vec![Command::SetPixelSize(4)]);
        assert!(ctx.take_pending().is_empty());
    }

    #[test]
    fn hints_are_validated_before_queueing() {
        let mut ctx = EngineCtx::new(Size::new(64, 64));
        assert_eq!(
            ctx.set_hint(HintKey::Dithering, HintValue::Bilinear),
            Err(ConfigError::InvalidHint { key: HintKey::Dithering, value: HintValue::Bilinear })
        );
        assert!(matches!(
            ctx.set_hint_named("sharpness", "max"),
            Err(ConfigError::UnknownHint(_))
        ));
        ctx.set_hint_named("interpolation", "bilinear").unwrap();
        assert_eq!(
            ctx.take_pending(),
            vec![Command::SetHint(HintKey::Interpolation, HintValue::Bilinear)]
        );
    }
}
