use crate::camera::CoordinateCorrection;

/// Frame coordinator configuration.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CoordinatorConfig {
    /// Applied to every incoming view matrix before it is stored.
    pub correction: CoordinateCorrection,
}

impl CoordinatorConfig {
    pub fn with_correction(mut self, correction: CoordinateCorrection) -> Self {
        self.correction = correction;
        self
    }
}
