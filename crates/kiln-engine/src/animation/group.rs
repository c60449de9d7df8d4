use std::time::{Duration, Instant};

use crate::batch::Batch;
use crate::error::AnimationError;

use super::AnimationState;

/// Several animations of which exactly one is active. Every operation goes to
/// the active one.
#[derive(Debug, Clone)]
pub struct AnimationGroup {
    states: Vec<AnimationState>,
    current: usize,
}

impl AnimationGroup {
    pub fn new(initial: usize, states: Vec<AnimationState>) -> Result<Self, AnimationError> {
        if states.is_empty() {
            return Err(AnimationError::EmptyGroup);
        }
        check_index(initial, states.len())?;
        Ok(Self { states, current: initial })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn current(&self) -> &AnimationState {
        &self.states[self.current]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut AnimationState {
        &mut self.states[self.current]
    }

    pub fn get(&self, index: usize) -> Option<&AnimationState> {
        self.states.get(index)
    }

    /// Switches the active animation. The previous one is not ended; pair
    /// `begin`/`end` around the switch yourself.
    pub fn set_current(&mut self, index: usize) -> Result<(), AnimationError> {
        check_index(index, self.states.len())?;
        self.current = index;
        Ok(())
    }

    pub fn begin(&self, batch: &mut Batch<'_>) {
        self.current().begin(batch);
    }

    pub fn end(&self, batch: &mut Batch<'_>) {
        self.current().end(batch);
    }

    pub fn update(&mut self) {
        self.current_mut().update();
    }

    pub fn update_at(&mut self, now: Instant) {
        self.current_mut().update_at(now);
    }

    pub fn reset(&mut self) {
        self.current_mut().reset();
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.current_mut().set_interval(interval);
    }
}

fn check_index(index: usize, len: usize) -> Result<(), AnimationError> {
    if index >= len {
        return Err(AnimationError::AnimationOutOfRange { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchState;
    use crate::batch::BatchId;
    use crate::coords::Size;
    use crate::core::Assets;
    use crate::surface::{PixelBuffer, RasterSettings};

    fn group(start: Instant) -> AnimationGroup {
        let ms = Duration::from_millis(50);
        let idle = AnimationState::new("hero", vec![(0, 0), (1, 0)], 0, 0, ms)
            .unwrap()
            .started_at(start);
        let run = AnimationState::new("hero", vec![(0, 1), (1, 1), (2, 1)], 0, 0, ms)
            .unwrap()
            .started_at(start);
        AnimationGroup::new(0, vec![idle, run]).unwrap()
    }

    // ── selection ─────────────────────────────────────────────────────────

    #[test]
    fn rejects_empty_and_bad_index() {
        assert_eq!(AnimationGroup::new(0, vec![]).unwrap_err(), AnimationError::EmptyGroup);
        let mut g = group(Instant::now());
        assert_eq!(
            g.set_current(2),
            Err(AnimationError::AnimationOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(g.current_index(), 0);
    }

    #[test]
    fn only_active_state_updates() {
        let t = Instant::now();
        let mut g = group(t);
        g.update_at(t + Duration::from_millis(60));
        assert_eq!(g.current().current_frame(), 1);

        g.set_current(1).unwrap();
        g.update_at(t + Duration::from_millis(120));
        assert_eq!(g.current().current_frame(), 1);
        assert_eq!(g.get(0).unwrap().current_frame(), 1);

        g.reset();
        assert_eq!(g.current().current_frame(), 0);
        assert_eq!(g.get(0).unwrap().current_frame(), 1);
    }

    // ── batch binding ─────────────────────────────────────────────────────

    #[test]
    fn begin_binds_active_cell_and_end_releases() {
        let mut assets = Assets::new();
        assets
            .sprites
            .register_sheet("hero", image::RgbaImage::new(48, 32), 16, 16)
            .unwrap();
        let mut state = BatchState::new(BatchId(1), Size::new(32, 32));
        let mut target = PixelBuffer::new(Size::new(32, 32));
        let settings = RasterSettings::default();
        let mut batch = Batch::new(&mut state, &mut target, &settings, &mut assets);

        let mut g = group(Instant::now());
        g.set_current(1).unwrap();
        g.begin(&mut batch);
        assert_eq!(batch.bound_spritesheet(), Some("hero"));
        let sprite = batch.bound_sprite().unwrap();
        assert_eq!((sprite.region().x, sprite.region().y), (0, 16));

        g.end(&mut batch);
        assert!(batch.bound_sprite().is_none());
        assert!(batch.bound_spritesheet().is_none());
    }
}
