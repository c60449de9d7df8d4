use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::coords::{Region, Size};
use crate::error::SpriteError;

use super::{Sprite, Spritesheet};

/// Named spritesheets plus their memoized sprites.
///
/// Lookups follow one policy: a region that leaves its sheet yields `None`,
/// and so does an unknown sheet name (logged at `warn`).
#[derive(Debug, Default)]
pub struct SpriteCache {
    sheets: HashMap<Arc<str>, Spritesheet>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` under `name`, divided into `cell_width x cell_height`
    /// cells.
    pub fn register_sheet(
        &mut self,
        name: &str,
        image: RgbaImage,
        cell_width: u32,
        cell_height: u32,
    ) -> Result<(), SpriteError> {
        if name.trim().is_empty() {
            return Err(SpriteError::EmptyName);
        }
        if self.sheets.contains_key(name) {
            return Err(SpriteError::Duplicate(name.to_string()));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(SpriteError::EmptyImage(name.to_string()));
        }
        if cell_width == 0 || cell_height == 0 {
            return Err(SpriteError::ZeroCell {
                name: name.to_string(),
                width: cell_width,
                height: cell_height,
            });
        }

        let key: Arc<str> = Arc::from(name);
        log::debug!(
            "registered spritesheet {name:?} ({}x{}, cells {cell_width}x{cell_height})",
            image.width(),
            image.height()
        );
        self.sheets.insert(
            Arc::clone(&key),
            Spritesheet::new(key, image, Size::new(cell_width, cell_height)),
        );
        Ok(())
    }

    /// Decodes an image file and registers it as a sheet.
    pub fn load_sheet(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
        cell_width: u32,
        cell_height: u32,
    ) -> Result<(), SpriteError> {
        if name.trim().is_empty() {
            return Err(SpriteError::EmptyName);
        }
        if self.sheets.contains_key(name) {
            return Err(SpriteError::Duplicate(name.to_string()));
        }
        let image = image::open(path.as_ref())
            .map_err(|source| SpriteError::Decode { name: name.to_string(), source })?
            .to_rgba8();
        self.register_sheet(name, image, cell_width, cell_height)
    }

    #[inline]
    pub fn contains_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    #[inline]
    pub fn sheet(&self, name: &str) -> Option<&Spritesheet> {
        self.sheets.get(name)
    }

    /// Sprite for grid cell `(cx, cy)` of `sheet`.
    pub fn get_cell(&mut self, sheet: &str, cx: i32, cy: i32) -> Option<Arc<Sprite>> {
        let sh = self.lookup(sheet)?;
        let region = Region::cell(cx, cy, sh.cell_size())?;
        let sprite = sh.extract(region);
        if sprite.is_none() {
            log::debug!("cell ({cx}, {cy}) is outside spritesheet {sheet:?}");
        }
        sprite
    }

    /// Sprite for an arbitrary pixel rectangle of `sheet`.
    pub fn get_region(
        &mut self,
        sheet: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Option<Arc<Sprite>> {
        let region = Region::new(x, y, width, height);
        let sprite = self.lookup(sheet)?.extract(region);
        if sprite.is_none() {
            log::debug!("region {region:?} is outside spritesheet {sheet:?}");
        }
        sprite
    }

    /// Drops every sheet and cached sprite. Outstanding `Arc<Sprite>`s stay
    /// valid.
    pub fn clear(&mut self) {
        self.sheets.clear();
    }

    #[inline]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Number of memoized sprites across all sheets.
    pub fn sprite_count(&self) -> usize {
        self.sheets.values().map(Spritesheet::cached_count).sum()
    }

    fn lookup(&mut self, sheet: &str) -> Option<&mut Spritesheet> {
        let found = self.sheets.get_mut(sheet);
        if found.is_none() {
            log::warn!("spritesheet {sheet:?} is not registered");
        }
        found
    }
}
