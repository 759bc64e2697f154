//! Host-side geometry.
//!
//! Conventions follow the host surface: points, origin top-left, +X right,
//! +Y down. Everything is `f64` until it crosses the engine boundary.

mod bounds;
mod surface;

pub use bounds::Bounds;
pub use surface::SurfaceSize;
