//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue, configures the window
//! surface and hands out one frame (texture view + encoder) per refresh.

mod format;
mod gpu;

pub use format::{pixel_format_of, texture_format_of};
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
