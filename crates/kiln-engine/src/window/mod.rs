//! Windowing host: owns the winit event loop and feeds the run loop thread.

mod runtime;

pub use runtime::Runtime;
