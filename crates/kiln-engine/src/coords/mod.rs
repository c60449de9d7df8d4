//! Coordinate and geometry types shared by the rasterizer, batch and caches.
//!
//! Canonical space:
//! - Logical canvas pixels (device pixels divided by the pixel size)
//! - Origin top-left
//! - +X right, +Y down

mod affine;
mod rect;
mod region;
mod size;
mod vec2;

pub use affine::Affine;
pub use rect::Rect;
pub use region::Region;
pub use size::Size;
pub use vec2::Vec2;
