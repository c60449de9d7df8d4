use super::Size;

/// Integer sub-rectangle of an image, as requested by sprite lookups.
///
/// Coordinates are signed so that callers can ask for regions that start off
/// the image; such regions simply fail [`Region::fits_within`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Region of cell `(cx, cy)` on a grid of `cell`-sized cells.
    ///
    /// Returns `None` when the cell origin does not fit in `i32`.
    pub fn cell(cx: i32, cy: i32, cell: Size) -> Option<Region> {
        let cw = i32::try_from(cell.width).ok()?;
        let ch = i32::try_from(cell.height).ok()?;
        Some(Region::new(cx.checked_mul(cw)?, cy.checked_mul(ch)?, cw, ch))
    }

    /// `0 <= x`, `0 <= y`, `x + w <= bounds.width`, `y + h <= bounds.height`,
    /// with a non-empty extent. Evaluated in 64-bit so nothing overflows.
    pub fn fits_within(self, bounds: Size) -> bool {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        x >= 0
            && y >= 0
            && w > 0
            && h > 0
            && x + w <= i64::from(bounds.width)
            && y + h <= i64::from(bounds.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: Size = Size::new(64, 64);

    #[test]
    fn cell_region_is_scaled_by_cell_size() {
        let r = Region::cell(3, 3, Size::new(16, 16)).unwrap();
        assert_eq!(r, Region::new(48, 48, 16, 16));
        assert!(r.fits_within(SHEET));
    }

    #[test]
    fn cell_past_the_edge_does_not_fit() {
        let r = Region::cell(4, 4, Size::new(16, 16)).unwrap();
        assert!(!r.fits_within(SHEET));
    }

    #[test]
    fn negative_origin_does_not_fit() {
        assert!(!Region::new(-1, 0, 4, 4).fits_within(SHEET));
        assert!(!Region::new(0, -1, 4, 4).fits_within(SHEET));
    }

    #[test]
    fn exact_edge_fits() {
        assert!(Region::new(60, 60, 4, 4).fits_within(SHEET));
        assert!(!Region::new(61, 60, 4, 4).fits_within(SHEET));
    }

    #[test]
    fn huge_values_do_not_overflow() {
        assert!(!Region::new(i32::MAX, 0, i32::MAX, 1).fits_within(SHEET));
        assert!(Region::cell(i32::MAX, 0, Size::new(16, 16)).is_none());
    }

    #[test]
    fn empty_extent_does_not_fit() {
        assert!(!Region::new(0, 0, 0, 4).fits_within(SHEET));
    }
}
