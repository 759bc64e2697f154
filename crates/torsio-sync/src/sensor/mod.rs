//! Motion sensing.
//!
//! The sampler polls an [`Accelerometer`] on a dedicated thread at a fixed
//! rate and publishes each reading into a latest-value cell. The render loop
//! reads that cell once per frame without waiting; it may observe a sample
//! up to one sensor period old.

mod sample;
mod sampler;
mod ticker;

pub use sample::MotionSample;
pub use sampler::{Accelerometer, SamplerConfig, SensorSampler, DEFAULT_RATE_HZ};
pub use ticker::{Tick, Ticker};
