use std::sync::Arc;

use crate::coords::{Affine, Size};
use crate::paint::Color;
use crate::sprite::Sprite;

/// Identity of one canvas buffer-creation cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub(crate) u64);

/// Binder state owned by the canvas.
#[derive(Debug, Clone)]
pub(crate) struct BatchState {
    pub id: BatchId,
    pub size: Size,
    pub spritesheet: Option<Arc<str>>,
    pub sprite: Option<Arc<Sprite>>,
    pub color: Color,
    pub clear_color: Color,
    pub stroke: f32,
    pub transform: Affine,
}

impl BatchState {
    pub fn new(id: BatchId, size: Size) -> Self {
        Self {
            id,
            size,
            spritesheet: None,
            sprite: None,
            color: Color::WHITE,
            clear_color: Color::BLACK,
            stroke: 1.0,
            transform: Affine::IDENTITY,
        }
    }
}
