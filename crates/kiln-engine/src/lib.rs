//! Kiln engine crate.
//!
//! A small 2D game runtime: a fixed-step run loop on its own thread, a
//! pixel-scaled software canvas presented through wgpu, and the sprite,
//! animation and text helpers games draw with.

pub mod animation;
pub mod batch;
pub mod canvas;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod fatal;
pub mod hints;
pub mod runloop;
pub mod scene;
pub mod sprite;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod model;
pub mod paint;
pub mod surface;
pub mod text;

pub use animation::{AnimationGroup, AnimationState};
pub use batch::Batch;
pub use canvas::Canvas;
pub use config::EngineConfig;
pub use crate::core::{App, AppControl, Assets, EngineCtx};
pub use runloop::{Command, LoopHandle, LoopStats, RunLoop};
pub use sprite::SpriteCache;
pub use window::Runtime;
