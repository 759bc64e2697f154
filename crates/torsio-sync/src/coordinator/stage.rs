use std::fmt;

/// Per-frame operations subject to ordering.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOp {
    UpdateCamera,
    UpdateWorld,
    Encode,
    EndFrame,
}

impl fmt::Display for FrameOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UpdateCamera => "update_camera",
            Self::UpdateWorld => "update_world",
            Self::Encode => "encode",
            Self::EndFrame => "end_frame",
        })
    }
}

/// Progress through the current refresh.
///
/// ```text
/// Idle --update_camera--> CameraUpdated --update_world--> WorldUpdated --encode/end_frame--> Idle
///   \________________________update_world________________/^
/// ```
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FrameStage {
    #[default]
    Idle,
    CameraUpdated,
    WorldUpdated,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::CameraUpdated => "camera updated",
            Self::WorldUpdated => "world updated",
        })
    }
}

impl FrameStage {
    /// Stage reached by performing `op` from `self`, or `None` if `op` is not
    /// allowed here.
    pub fn after(self, op: FrameOp) -> Option<FrameStage> {
        use FrameOp::*;
        use FrameStage::*;

        match (self, op) {
            (Idle, UpdateCamera) => Some(CameraUpdated),
            (Idle | CameraUpdated, UpdateWorld) => Some(WorldUpdated),
            (WorldUpdated, Encode | EndFrame) => Some(Idle),
            _ => None,
        }
    }
}
