//! GPU device, surface and frame presentation.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for a window
//! - configuring the Surface (a double-buffered swapchain by default)
//! - uploading finished canvas frames and blitting them to the surface

mod error;
mod gpu;
mod init;
mod presenter;
mod surface;

pub use error::SurfaceErrorAction;
pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use presenter::GpuPresenter;
