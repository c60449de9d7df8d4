//! Time subsystem.
//!
//! Provides the fixed-step accumulator used by the run loop and a `Clock`
//! seam so the loop can be driven by a manual clock in tests.
//! Intended usage:
//! - one `FrameClock` per run loop
//! - call `tick(now)` once per pass and run one update per yielded step

mod clock;
mod frame_clock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_clock::{FrameClock, Steps, MAX_RATE, MIN_RATE};
