//! Spritesheet registry and sprite cache.
//!
//! Sheets are registered once under a unique name. Sprites are sub-images
//! extracted lazily on first lookup and memoized until [`SpriteCache::clear`].

mod cache;
mod sheet;

pub use cache::SpriteCache;
pub use sheet::{Sprite, Spritesheet};
