use std::time::{Duration, Instant};

use crate::error::ConfigError;

pub const MIN_RATE: u32 = 1;
pub const MAX_RATE: u32 = 999;

/// Update steps owed for one pass.
///
/// Iterating yields the live accumulator value seen by each update call:
/// `entry`, `entry - 1`, ... for `count` items. Every yielded value is `>= 1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Steps {
    entry: f64,
    count: u32,
    yielded: u32,
}

impl Steps {
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Accumulator value before any step of this pass was consumed.
    #[inline]
    pub fn entry(&self) -> f64 {
        self.entry
    }
}

impl Iterator for Steps {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.yielded >= self.count {
            return None;
        }
        let delta = self.entry - f64::from(self.yielded);
        self.yielded += 1;
        Some(delta)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.yielded) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Steps {}

/// Fixed-step accumulator.
///
/// Each `tick` converts the wall time elapsed since the previous tick into
/// update steps (`elapsed / (1e9 / rate)`), adds it to the accumulator and
/// hands out the whole steps. The fractional remainder carries over.
#[derive(Debug, Clone)]
pub struct FrameClock {
    rate: u32,
    nanos_per_step: f64,
    accumulator: f64,
    last: Option<Instant>,
    max_elapsed: Option<Duration>,
}

impl FrameClock {
    /// Creates a clock targeting `rate` updates per second (1..=999).
    pub fn new(rate: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            rate: validate_rate(rate)?,
            nanos_per_step: nanos_per_step(rate),
            accumulator: 0.0,
            last: None,
            max_elapsed: None,
        })
    }

    /// Clamps the wall time counted by a single tick.
    ///
    /// Without a clamp, a long stall (debugger, suspended laptop) produces a
    /// burst of catch-up updates.
    pub fn with_max_elapsed(mut self, max: Duration) -> Self {
        self.max_elapsed = Some(max);
        self
    }

    #[inline]
    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: u32) -> Result<(), ConfigError> {
        self.rate = validate_rate(rate)?;
        self.nanos_per_step = nanos_per_step(rate);
        Ok(())
    }

    #[inline]
    pub fn nanos_per_step(&self) -> f64 {
        self.nanos_per_step
    }

    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Rate-limiting pause between passes (`1000 / rate` ms, rounded up to
    /// the next whole nanosecond).
    #[inline]
    pub fn sleep_period(&self) -> Duration {
        Duration::from_nanos(self.nanos_per_step.ceil() as u64)
    }

    /// Sets the sampling baseline and drops any owed steps.
    pub fn start(&mut self, now: Instant) {
        self.last = Some(now);
        self.accumulator = 0.0;
    }

    /// Samples `now` and returns the whole steps owed.
    ///
    /// The first tick after construction only establishes the baseline.
    pub fn tick(&mut self, now: Instant) -> Steps {
        let Some(last) = self.last.replace(now) else {
            return Steps { entry: self.accumulator, count: 0, yielded: 0 };
        };

        let mut elapsed = now.saturating_duration_since(last);
        if let Some(max) = self.max_elapsed {
            elapsed = elapsed.min(max);
        }

        self.accumulator += elapsed.as_nanos() as f64 / self.nanos_per_step;

        let entry = self.accumulator;
        let whole = entry.floor();
        let count = if whole >= f64::from(u32::MAX) { u32::MAX } else { whole as u32 };
        self.accumulator -= f64::from(count);

        Steps { entry, count, yielded: 0 }
    }
}

fn validate_rate(rate: u32) -> Result<u32, ConfigError> {
    if (MIN_RATE..=MAX_RATE).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::FrameRate(rate))
    }
}

#[inline]
fn nanos_per_step(rate: u32) -> f64 {
    1e9 / f64::from(rate)
}
