//! Application contract and the context handed to it.
//!
//! - `App` is implemented by the game and driven by the run loop thread
//! - `EngineCtx` carries long-lived assets and buffers configuration intents
//!   that the loop applies between update and render

mod app;
mod assets;
mod ctx;

pub use app::{App, AppControl};
pub use assets::Assets;
pub use ctx::EngineCtx;
