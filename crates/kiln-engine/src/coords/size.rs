/// Integer size in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count, widened so large surfaces cannot overflow.
    #[inline]
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Size divided by an integer scale factor (truncating).
    #[inline]
    pub fn scaled_down(self, factor: u32) -> Size {
        let factor = factor.max(1);
        Size::new(self.width / factor, self.height / factor)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    fn from(s: winit::dpi::PhysicalSize<u32>) -> Self {
        Size::new(s.width, s.height)
    }
}
