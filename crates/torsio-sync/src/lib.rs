//! torsio synchronization core.
//!
//! Sits between a host shell (surface, camera tracking, motion sensing,
//! touch input, one UI slider) and a native rendering/simulation engine,
//! and delivers the host's asynchronously-updated inputs to the engine in a
//! fixed per-frame order without ever blocking the render loop.

pub mod boundary;
pub mod camera;
pub mod coordinator;
pub mod coords;
pub mod logging;
pub mod marshal;
pub mod param;
pub mod pose;
pub mod sensor;
pub mod slot;
pub mod touch;

pub use boundary::{BoundaryError, EngineBoundary, PixelFormat};
pub use coordinator::{CoordinatorConfig, CoordinatorError, FrameCoordinator, FrameReport};
pub use param::ParameterStore;
pub use pose::{Pose, PoseSource};
pub use sensor::{Accelerometer, MotionSample, SamplerConfig, SensorSampler};
