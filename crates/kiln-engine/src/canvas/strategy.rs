use crate::coords::Size;
use crate::surface::PixelBuffer;

/// Host surface the canvas fits itself to and presents through.
pub trait BufferStrategy: Send {
    /// Whether the host is currently visible. Hidden hosts skip buffer
    /// creation.
    fn is_showing(&self) -> bool;

    fn set_showing(&mut self, showing: bool);

    /// Current host size in device pixels.
    fn parent_size(&self) -> Size;

    /// Called when the host has been resized.
    fn resize(&mut self, size: Size);

    /// Displays a finished device-sized frame.
    fn show(&mut self, back: &PixelBuffer) -> anyhow::Result<()>;
}

/// Off-screen strategy that keeps the last presented frame.
#[derive(Debug, Clone)]
pub struct Headless {
    size: Size,
    showing: bool,
    last: Option<PixelBuffer>,
    presented: u64,
}

impl Headless {
    pub fn new(size: Size) -> Self {
        Self { size, showing: true, last: None, presented: 0 }
    }

    #[inline]
    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last.as_ref()
    }

    /// Number of frames shown so far.
    #[inline]
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl BufferStrategy for Headless {
    fn is_showing(&self) -> bool {
        self.showing
    }

    fn set_showing(&mut self, showing: bool) {
        self.showing = showing;
    }

    fn parent_size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn show(&mut self, back: &PixelBuffer) -> anyhow::Result<()> {
        match &mut self.last {
            Some(last) if last.size() == back.size() => last.clone_from(back),
            slot => *slot = Some(back.clone()),
        }
        self.presented += 1;
        Ok(())
    }
}
