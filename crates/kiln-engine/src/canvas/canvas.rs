use crate::batch::{Batch, BatchId, BatchState};
use crate::coords::Size;
use crate::core::Assets;
use crate::error::ConfigError;
use crate::hints::{HintKey, HintSet, HintValue};
use crate::surface::{PixelBuffer, RasterSettings};

use super::BufferStrategy;

/// Largest pixel size accepted for a host of `parent` device pixels when
/// `requested` is being tried.
///
/// This is the smallest `m >= 1` with `(w * h) / m < 1000`, where `w x h` is
/// the logical size at the requested pixel size.
pub fn max_pixel_size(parent: Size, requested: u32) -> u32 {
    let logical = parent.scaled_down(requested);
    let max = logical.area() / 1000 + 1;
    u32::try_from(max).unwrap_or(u32::MAX)
}

/// Owner of the back buffer, the optional low-resolution buffer and the
/// batch state bound to them.
pub struct Canvas<S> {
    strategy: S,
    pixel_size: u32,
    device: Size,
    validated: bool,
    back: PixelBuffer,
    logical: Option<PixelBuffer>,
    batch: Option<BatchState>,
    hints: HintSet,
    settings: RasterSettings,
    next_batch: u64,
    allocations: u64,
}

impl<S: BufferStrategy> Canvas<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            pixel_size: 1,
            device: Size::default(),
            validated: false,
            back: PixelBuffer::new(Size::default()),
            logical: None,
            batch: None,
            hints: HintSet::new(),
            settings: RasterSettings::default(),
            next_batch: 0,
            allocations: 0,
        }
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    #[inline]
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Size of the back buffer at the last `prepare`.
    #[inline]
    pub fn device_size(&self) -> Size {
        self.device
    }

    /// Size the batch draws in.
    #[inline]
    pub fn logical_size(&self) -> Size {
        self.device.scaled_down(self.pixel_size)
    }

    #[inline]
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Number of buffer-creation cycles so far.
    #[inline]
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    #[inline]
    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    /// Application hint overrides (layered over the canvas defaults).
    #[inline]
    pub fn hints(&self) -> &HintSet {
        &self.hints
    }

    /// Forces buffer and batch recreation on the next `prepare`.
    pub fn invalidate(&mut self) {
        self.validated = false;
    }

    /// Checks `requested` against the current host size.
    pub fn check_pixel_size(&self, requested: u32) -> Result<(), ConfigError> {
        check_pixel_size(self.strategy.parent_size(), requested)
    }

    /// Changes the upscale factor. Takes effect at the next `prepare`.
    pub fn set_pixel_size(&mut self, requested: u32) -> Result<(), ConfigError> {
        self.check_pixel_size(requested)?;
        if requested != self.pixel_size {
            log::debug!("pixel size {} -> {requested}", self.pixel_size);
        }
        self.pixel_size = requested;
        self.invalidate();
        Ok(())
    }

    /// Sets a hint override and applies it to the live surface.
    pub fn set_hint(&mut self, key: HintKey, value: HintValue) -> Result<(), ConfigError> {
        self.hints.set(key, value)?;
        self.settings = HintSet::canvas_defaults().layered(&self.hints).resolve();
        Ok(())
    }

    /// Forwards a host resize and invalidates the buffers.
    pub fn resize(&mut self, size: Size) {
        self.strategy.resize(size);
        self.invalidate();
    }

    /// Forwards host visibility.
    pub fn set_showing(&mut self, showing: bool) {
        self.strategy.set_showing(showing);
    }

    /// Builds buffers and a fresh batch if the host is showing and the canvas
    /// is not validated. Returns whether a rebuild happened.
    pub fn prepare(&mut self) -> bool {
        if self.validated || !self.strategy.is_showing() {
            return false;
        }

        let device = self.strategy.parent_size();
        let logical = device.scaled_down(self.pixel_size);
        if logical.is_empty() {
            return false;
        }

        if self.back.size() != device {
            self.back = PixelBuffer::new(device);
        } else {
            self.back.fill(crate::paint::Color::BLACK);
        }
        self.logical = (self.pixel_size > 1).then(|| PixelBuffer::new(logical));

        self.settings = HintSet::canvas_defaults().layered(&self.hints).resolve();

        self.next_batch += 1;
        self.batch = Some(BatchState::new(BatchId(self.next_batch), logical));

        self.device = device;
        self.validated = true;
        self.allocations += 1;

        log::debug!(
            "canvas buffers {}x{} (logical {}x{}, pixel size {})",
            device.width,
            device.height,
            logical.width,
            logical.height,
            self.pixel_size
        );
        true
    }

    /// Id of the live batch, if any.
    pub fn batch_id(&self) -> Option<BatchId> {
        self.batch.as_ref().filter(|_| self.validated).map(|b| b.id)
    }

    /// Batch for the live buffers, or `None` before the first successful
    /// `prepare` or after invalidation.
    pub fn batch<'a>(&'a mut self, assets: &'a mut Assets) -> Option<Batch<'a>> {
        if !self.validated {
            return None;
        }
        let state = self.batch.as_mut()?;
        let target = self.logical.as_mut().unwrap_or(&mut self.back);
        Some(Batch::new(state, target, &self.settings, assets))
    }

    /// Stretches the logical buffer onto the back buffer (if pixel scaling is
    /// active) and shows the back buffer.
    pub fn present(&mut self) -> anyhow::Result<()> {
        if !self.validated {
            return Ok(());
        }
        if let Some(logical) = &self.logical {
            logical.upscale_into(&mut self.back, self.settings.interpolation);
        }
        self.strategy.show(&self.back)
    }
}

fn check_pixel_size(parent: Size, requested: u32) -> Result<(), ConfigError> {
    let max = max_pixel_size(parent, requested.max(1));
    if requested < 1 || requested > max {
        return Err(ConfigError::PixelSize { requested, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Headless;
    use crate::paint::Color;

    fn canvas(w: u32, h: u32) -> Canvas<Headless> {
        Canvas::new(Headless::new(Size::new(w, h)))
    }

    // ── pixel size ────────────────────────────────────────────────────────

    #[test]
    fn pixel_size_limits_at_720p() {
        let mut c = canvas(1280, 720);
        assert_eq!(c.set_pixel_size(0), Err(ConfigError::PixelSize { requested: 0, max: 922 }));
        assert_eq!(c.set_pixel_size(11), Err(ConfigError::PixelSize { requested: 11, max: 8 }));
        assert!(c.set_pixel_size(10).is_ok());
        assert_eq!(c.pixel_size(), 10);
    }

    #[test]
    fn rejected_pixel_size_keeps_previous() {
        let mut c = canvas(1280, 720);
        c.set_pixel_size(4).unwrap();
        assert!(c.set_pixel_size(50).is_err());
        assert_eq!(c.pixel_size(), 4);
    }

    #[test]
    fn tiny_host_only_allows_one() {
        assert_eq!(max_pixel_size(Size::new(10, 10), 1), 1);
        assert_eq!(max_pixel_size(Size::new(0, 0), 3), 1);
    }

    // ── prepare ───────────────────────────────────────────────────────────

    #[test]
    fn prepare_twice_allocates_once() {
        let mut c = canvas(64, 48);
        assert!(c.prepare());
        assert!(!c.prepare());
        assert_eq!(c.allocations(), 1);
        assert_eq!(c.device_size(), Size::new(64, 48));
    }

    #[test]
    fn hidden_host_is_not_prepared() {
        let mut c = canvas(64, 48);
        c.set_showing(false);
        assert!(!c.prepare());
        assert!(c.batch(&mut Assets::new()).is_none());
        c.set_showing(true);
        assert!(c.prepare());
    }

    #[test]
    fn zero_sized_host_stays_unvalidated() {
        let mut c = canvas(0, 0);
        assert!(!c.prepare());
        assert!(!c.is_validated());
    }

    #[test]
    fn resize_rebuilds_buffers() {
        let mut c = canvas(64, 48);
        c.prepare();
        c.resize(Size::new(100, 80));
        assert!(c.prepare());
        assert_eq!(c.device_size(), Size::new(100, 80));
        assert_eq!(c.allocations(), 2);
    }

    #[test]
    fn pixel_size_change_replaces_batch_and_keeps_sprites() {
        let mut c = canvas(256, 256);
        let mut assets = Assets::new();
        assets
            .sprites
            .register_sheet("tiles", image::RgbaImage::new(64, 64), 16, 16)
            .unwrap();
        let sprite = assets.sprites.get_cell("tiles", 1, 1).unwrap();

        c.set_pixel_size(1).unwrap();
        c.prepare();
        let first = c.batch(&mut assets).unwrap().id();

        c.set_pixel_size(4).unwrap();
        assert!(c.batch(&mut assets).is_none());
        c.prepare();
        let batch = c.batch(&mut assets).unwrap();
        assert_ne!(batch.id(), first);
        assert_eq!((batch.width(), batch.height()), (64, 64));

        let again = assets.sprites.get_cell("tiles", 1, 1).unwrap();
        assert!(std::sync::Arc::ptr_eq(&sprite, &again));
    }

    // ── present ───────────────────────────────────────────────────────────

    #[test]
    fn present_upscales_logical_pixels() {
        let mut c = canvas(64, 64);
        c.set_pixel_size(2).unwrap();
        c.prepare();
        let mut assets = Assets::new();
        {
            let mut batch = c.batch(&mut assets).unwrap();
            batch.set_color(Color::WHITE);
            batch.fill_rect(0.0, 0.0, 1.0, 1.0);
        }
        c.present().unwrap();

        let frame = c.strategy().last_frame().unwrap();
        assert_eq!(frame.size(), Size::new(64, 64));
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(frame.pixel(x, y), Some([255, 255, 255, 255]));
        }
        assert_eq!(frame.pixel(2, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn present_before_prepare_shows_nothing() {
        let mut c = canvas(8, 8);
        c.present().unwrap();
        assert_eq!(c.strategy().presented(), 0);
    }

    #[test]
    fn hint_overrides_survive_rebuilds() {
        let mut c = canvas(16, 16);
        c.set_hint(HintKey::Antialias, HintValue::True).unwrap();
        c.prepare();
        assert!(c.settings().antialias);
        c.invalidate();
        c.prepare();
        assert!(c.settings().antialias);
        assert!(c.set_hint(HintKey::Antialias, HintValue::Nearest).is_err());
    }
}
