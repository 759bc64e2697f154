use std::fmt;

use crate::boundary::{BoundaryError, PixelFormat};

use super::{FrameOp, FrameStage};

/// Errors surfaced by [`FrameCoordinator`](super::FrameCoordinator).
///
/// None of these are retried by the coordinator. `PipelineNotReady`,
/// `PipelineAlreadyCreated` and `OutOfOrder` are host bugs; `Boundary`
/// carries an engine failure and is fatal for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    /// A frame operation ran before pipeline state existed.
    PipelineNotReady { op: FrameOp },

    /// `create_pipeline_states` was called a second time.
    PipelineAlreadyCreated { active: PixelFormat },

    /// A frame operation violated the per-frame sequence.
    OutOfOrder { op: FrameOp, stage: FrameStage },

    Boundary(BoundaryError),
}

impl fmt::Display for CoordinatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PipelineNotReady { op } => {
                write!(f, "{op} called before pipeline state was created")
            }
            Self::PipelineAlreadyCreated { active } => {
                write!(f, "pipeline state already created for {active}")
            }
            Self::OutOfOrder { op, stage } => {
                write!(f, "{op} is not allowed in frame stage '{stage}'")
            }
            Self::Boundary(e) => write!(f, "engine boundary error: {e}"),
        }
    }
}

impl std::error::Error for CoordinatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Boundary(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BoundaryError> for CoordinatorError {
    fn from(e: BoundaryError) -> Self {
        Self::Boundary(e)
    }
}
