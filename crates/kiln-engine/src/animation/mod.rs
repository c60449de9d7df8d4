//! Frame-sequence animation over spritesheet cells.

mod group;
mod state;

pub use group::AnimationGroup;
pub use state::AnimationState;
