//! The update/render loop and its cross-thread surface.
//!
//! A `RunLoop` owns the application, the canvas and the frame clock. It runs
//! on one dedicated thread; other threads only see a cloneable `LoopHandle`
//! that can request a stop, post `Command`s and read the last second's
//! counters.

mod command;
mod handle;
mod run_loop;

pub use command::Command;
pub use handle::{LoopHandle, LoopStats};
pub use run_loop::{LoopThread, RunLoop};
