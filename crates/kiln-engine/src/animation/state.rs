use std::time::{Duration, Instant};

use crate::batch::Batch;
use crate::error::AnimationError;

/// A cyclic sequence of spritesheet cells advanced on a fixed interval.
#[derive(Debug, Clone)]
pub struct AnimationState {
    sheet: String,
    frames: Vec<(i32, i32)>,
    current: usize,
    default: usize,
    interval: Duration,
    last: Instant,
}

impl AnimationState {
    /// `initial` and `default` index into `frames`, which must not be empty.
    pub fn new(
        sheet: impl Into<String>,
        frames: Vec<(i32, i32)>,
        initial: usize,
        default: usize,
        interval: Duration,
    ) -> Result<Self, AnimationError> {
        let len = frames.len();
        if len == 0 {
            return Err(AnimationError::NoFrames);
        }
        for index in [initial, default] {
            if index >= len {
                return Err(AnimationError::FrameOutOfRange { index, len });
            }
        }
        Ok(Self {
            sheet: sheet.into(),
            frames,
            current: initial,
            default,
            interval,
            last: Instant::now(),
        })
    }

    /// Restarts the advance timer at `now`.
    #[must_use]
    pub fn started_at(mut self, now: Instant) -> Self {
        self.last = now;
        self
    }

    #[inline]
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    #[inline]
    pub fn frames(&self) -> &[(i32, i32)] {
        &self.frames
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Cell coordinates of the current frame.
    #[inline]
    pub fn current_cell(&self) -> (i32, i32) {
        self.frames[self.current]
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Advances one frame if more than the interval has passed since the last
    /// advance.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// [`update`](Self::update) against an explicit timestamp. The timer
    /// starts at construction.
    pub fn update_at(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last) > self.interval {
            self.last = now;
            self.current = (self.current + 1) % self.frames.len();
        }
    }

    /// Jumps back to the default frame. The timer is left alone.
    pub fn reset(&mut self) {
        self.current = self.default;
    }

    /// Binds the sheet and the current frame's cell on `batch`.
    pub fn begin(&self, batch: &mut Batch<'_>) {
        let (cx, cy) = self.current_cell();
        batch.bind_spritesheet(&self.sheet);
        batch.bind_sprite(cx, cy);
    }

    /// Releases what [`begin`](Self::begin) bound.
    pub fn end(&self, batch: &mut Batch<'_>) {
        batch.unbind_sprite();
        batch.unbind_spritesheet();
    }
}
