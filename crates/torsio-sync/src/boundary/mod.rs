//! Engine boundary.
//!
//! The native engine (pipeline state, GPU buffers, simulation) is an external
//! collaborator. Everything this crate needs from it is the five entry points
//! of [`EngineBoundary`], fed with flat primitive arrays (see [`crate::marshal`]).
//!
//! Call order contract, enforced by [`crate::coordinator::FrameCoordinator`]:
//! `create_pipeline_states` completes before anything else; afterwards each
//! refresh performs `set_camera_matrices` (only when a new pose arrived),
//! `update_world` once, then `encode` once. `update_screen_sizes` may come
//! between frames.

mod error;
mod format;

#[cfg(test)]
pub(crate) mod recording;

pub use error::BoundaryError;
pub use format::{ParsePixelFormatError, PixelFormat};

/// Entry points of the rendering/simulation engine.
///
/// All calls originate from the thread that owns the coordinator; the engine
/// never sees concurrent access.
pub trait EngineBoundary {
    /// Command-encoding handle for one refresh.
    ///
    /// The caller begins it before [`encode`](Self::encode) and ends it after;
    /// the engine only records into it.
    type Encoder<'a>;

    /// Builds pipeline state for the surface color format.
    ///
    /// Failure is fatal: without pipelines the engine cannot render.
    fn create_pipeline_states(&mut self, format: PixelFormat) -> Result<(), BoundaryError>;

    /// Surface size in points/pixels; drives viewport and projection setup.
    fn update_screen_sizes(&mut self, width: f64, height: f64) -> Result<(), BoundaryError>;

    /// Replaces the engine's camera. Arrays are row-major (`k = row * 4 + col`).
    fn set_camera_matrices(
        &mut self,
        view: &[f32; 16],
        projection: &[f32; 16],
        transform: &[f32; 16],
    ) -> Result<(), BoundaryError>;

    /// Advances the simulation one step.
    ///
    /// `strength` is the torsional spring strength, already clamped to `[0, 1]`.
    fn update_world(&mut self, acceleration: &[f32; 3], strength: f32) -> Result<(), BoundaryError>;

    /// Emits draw commands into an encoder the caller has already begun.
    fn encode(&mut self, encoder: &mut Self::Encoder<'_>) -> Result<(), BoundaryError>;
}
