use crate::config::EngineConfig;

/// How the presenter asks wgpu for a device and swapchain.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Wait for vblank (`Fifo`). When off, wgpu picks the fastest
    /// non-blocking mode the surface offers.
    pub vsync: bool,

    /// Unsupported values fall back to the first mode the surface offers.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    /// Swapchain images the presentation engine may queue. `2` is double
    /// buffering; platforms treat this as a hint.
    pub frame_latency: u32,
}

impl GpuInit {
    /// Defaults adjusted to an engine configuration. An uncapped frame rate
    /// also turns vsync off, otherwise presentation would cap it anyway.
    pub fn for_engine(config: &EngineConfig) -> Self {
        Self { vsync: !config.unlimited_fps, ..Self::default() }
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync { wgpu::PresentMode::Fifo } else { wgpu::PresentMode::AutoNoVsync }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            vsync: true,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_double_buffered_with_vsync() {
        let init = GpuInit::default();
        assert_eq!(init.frame_latency, 2);
        assert_eq!(init.present_mode(), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn unlimited_frame_rate_drops_vsync() {
        let config = EngineConfig { unlimited_fps: true, ..EngineConfig::default() };
        let init = GpuInit::for_engine(&config);
        assert!(!init.vsync);
        assert_eq!(init.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert!(GpuInit::for_engine(&EngineConfig::default()).vsync);
    }
}
