//! Camera state and the tracking-space → render-space correction.

use glam::Mat4;

use crate::marshal::flatten_row_major;

/// Last committed camera.
///
/// Starts as identity ×3 and is replaced wholesale on every pose update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub view: Mat4,
    pub projection: Mat4,
    pub transform: Mat4,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            transform: Mat4::IDENTITY,
        }
    }
}

impl CameraState {
    /// Boundary representation: `(view, projection, transform)`, each row-major.
    pub fn flattened(&self) -> ([f32; 16], [f32; 16], [f32; 16]) {
        (
            flatten_row_major(&self.view),
            flatten_row_major(&self.projection),
            flatten_row_major(&self.transform),
        )
    }
}

/// Which side of the view matrix the correction is multiplied on.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum CorrectionOrder {
    /// `view * correction`.
    #[default]
    PostMultiply,
    /// `correction * view`.
    PreMultiply,
}

/// Fixed transform reconciling the tracker's coordinate conventions with the
/// engine's. Identity unless a host needs otherwise.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoordinateCorrection {
    pub matrix: Mat4,
    pub order: CorrectionOrder,
}

impl Default for CoordinateCorrection {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CoordinateCorrection {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
        order: CorrectionOrder::PostMultiply,
    };

    pub fn new(matrix: Mat4, order: CorrectionOrder) -> Self {
        Self { matrix, order }
    }

    /// Composes the correction with an incoming view matrix.
    #[inline]
    pub fn apply(&self, view: Mat4) -> Mat4 {
        match self.order {
            CorrectionOrder::PostMultiply => view * self.matrix,
            CorrectionOrder::PreMultiply => self.matrix * view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn identity_correction_leaves_view_unchanged() {
        let view = Mat4::look_at_rh(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        assert_eq!(CoordinateCorrection::IDENTITY.apply(view), view);
    }

    #[test]
    fn order_selects_operand_side() {
        let view = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let correction = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);

        let post = CoordinateCorrection::new(correction, CorrectionOrder::PostMultiply);
        let pre = CoordinateCorrection::new(correction, CorrectionOrder::PreMultiply);

        assert_eq!(post.apply(view), view * correction);
        assert_eq!(pre.apply(view), correction * view);
        assert_ne!(post.apply(view), pre.apply(view));
    }

    #[test]
    fn default_camera_is_identity() {
        let (v, p, t) = CameraState::default().flattened();
        let identity = Mat4::IDENTITY.to_cols_array();
        assert_eq!((v, p, t), (identity, identity, identity));
    }
}
