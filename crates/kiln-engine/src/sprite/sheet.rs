use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use crate::coords::{Region, Size};

/// Immutable sub-image of a spritesheet.
#[derive(Debug)]
pub struct Sprite {
    sheet: Arc<str>,
    region: Region,
    image: RgbaImage,
}

impl Sprite {
    #[inline]
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Source rectangle on the sheet.
    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Image divided into a grid of equally sized cells.
#[derive(Debug)]
pub struct Spritesheet {
    name: Arc<str>,
    image: RgbaImage,
    cell: Size,
    sprites: HashMap<Region, Arc<Sprite>>,
}

impl Spritesheet {
    pub(crate) fn new(name: Arc<str>, image: RgbaImage, cell: Size) -> Self {
        Self { name, image, cell, sprites: HashMap::new() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    #[inline]
    pub fn cell_size(&self) -> Size {
        self.cell
    }

    /// Number of whole cells along each axis.
    #[inline]
    pub fn grid(&self) -> (u32, u32) {
        (self.image.width() / self.cell.width, self.image.height() / self.cell.height)
    }

    #[inline]
    pub(crate) fn cached_count(&self) -> usize {
        self.sprites.len()
    }

    /// Memoized sub-image for `region`, or `None` if it leaves the sheet.
    pub(crate) fn extract(&mut self, region: Region) -> Option<Arc<Sprite>> {
        if !region.fits_within(self.size()) {
            return None;
        }

        if let Some(hit) = self.sprites.get(&region) {
            return Some(Arc::clone(hit));
        }

        // fits_within guarantees non-negative, in-bounds values.
        let image = image::imageops::crop_imm(
            &self.image,
            region.x as u32,
            region.y as u32,
            region.width as u32,
            region.height as u32,
        )
        .to_image();

        let sprite = Arc::new(Sprite { sheet: Arc::clone(&self.name), region, image });
        self.sprites.insert(region, Arc::clone(&sprite));
        Some(sprite)
    }
}
