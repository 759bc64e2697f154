//! In-memory engine that records every boundary call.

use super::{BoundaryError, EngineBoundary, PixelFormat};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BoundaryCall {
    CreatePipelineStates(PixelFormat),
    UpdateScreenSizes(f64, f64),
    SetCameraMatrices {
        view: [f32; 16],
        projection: [f32; 16],
        transform: [f32; 16],
    },
    UpdateWorld {
        acceleration: [f32; 3],
        strength: f32,
    },
    Encode,
}

/// Stand-in for a command encoder: counts the draws recorded into it.
#[derive(Debug, Default)]
pub(crate) struct RecordingEncoder {
    pub draws: u32,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    pub calls: Vec<BoundaryCall>,
    pub rejected_formats: Vec<PixelFormat>,
    /// When set, the next `update_world` fails with this message.
    pub fail_update_world: Option<&'static str>,
    /// When set, the next `set_camera_matrices` fails with this message.
    pub fail_set_camera: Option<&'static str>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(format: PixelFormat) -> Self {
        Self {
            rejected_formats: vec![format],
            ..Self::default()
        }
    }

    pub fn camera_calls(&self) -> Vec<&BoundaryCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, BoundaryCall::SetCameraMatrices { .. }))
            .collect()
    }

    pub fn world_calls(&self) -> Vec<([f32; 3], f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoundaryCall::UpdateWorld {
                    acceleration,
                    strength,
                } => Some((*acceleration, *strength)),
                _ => None,
            })
            .collect()
    }

    pub fn last_camera(&self) -> Option<([f32; 16], [f32; 16], [f32; 16])> {
        self.calls.iter().rev().find_map(|c| match c {
            BoundaryCall::SetCameraMatrices {
                view,
                projection,
                transform,
            } => Some((*view, *projection, *transform)),
            _ => None,
        })
    }
}

impl EngineBoundary for RecordingEngine {
    type Encoder<'a> = RecordingEncoder;

    fn create_pipeline_states(&mut self, format: PixelFormat) -> Result<(), BoundaryError> {
        if self.rejected_formats.contains(&format) {
            return Err(BoundaryError::UnsupportedPixelFormat(format));
        }
        self.calls.push(BoundaryCall::CreatePipelineStates(format));
        Ok(())
    }

    fn update_screen_sizes(&mut self, width: f64, height: f64) -> Result<(), BoundaryError> {
        self.calls.push(BoundaryCall::UpdateScreenSizes(width, height));
        Ok(())
    }

    fn set_camera_matrices(
        &mut self,
        view: &[f32; 16],
        projection: &[f32; 16],
        transform: &[f32; 16],
    ) -> Result<(), BoundaryError> {
        if let Some(message) = self.fail_set_camera.take() {
            return Err(BoundaryError::engine("set_camera_matrices", message));
        }
        self.calls.push(BoundaryCall::SetCameraMatrices {
            view: *view,
            projection: *projection,
            transform: *transform,
        });
        Ok(())
    }

    fn update_world(&mut self, acceleration: &[f32; 3], strength: f32) -> Result<(), BoundaryError> {
        if let Some(message) = self.fail_update_world.take() {
            return Err(BoundaryError::engine("update_world", message));
        }
        self.calls.push(BoundaryCall::UpdateWorld {
            acceleration: *acceleration,
            strength,
        });
        Ok(())
    }

    fn encode(&mut self, encoder: &mut RecordingEncoder) -> Result<(), BoundaryError> {
        encoder.draws += 1;
        self.calls.push(BoundaryCall::Encode);
        Ok(())
    }
}
