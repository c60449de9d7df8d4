use crate::model::ModelStore;
use crate::sprite::SpriteCache;
use crate::text::FontSystem;

/// Resources that outlive canvas buffers: sprites, models and fonts.
#[derive(Default)]
pub struct Assets {
    pub sprites: SpriteCache,
    pub models: ModelStore,
    pub fonts: FontSystem,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }
}
