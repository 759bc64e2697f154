//! Torsional needle simulation.
//!
//! A needle hangs from the world origin. In-plane acceleration swings it
//! like a pendulum; a torsional spring whose stiffness follows the strength
//! parameter pulls it back to rest (pointing down).

use glam::Vec2;

/// Fixed simulation step, one display refresh at 60 Hz.
pub const STEP: f32 = 1.0 / 60.0;

/// Spring stiffness at strength 1.
const SPRING_MAX: f32 = 40.0;
const DAMPING: f32 = 4.0;

/// Below this magnitude acceleration exerts no torque.
const MIN_ACCEL: f32 = 1e-4;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Needle {
    /// Radians from rest, counter-clockwise.
    pub angle: f32,
    pub velocity: f32,
}

impl Needle {
    /// Angle of `accel` measured the same way as [`Needle::angle`].
    fn target_angle(accel: Vec2) -> f32 {
        accel.x.atan2(-accel.y)
    }

    /// Advances one [`STEP`] (semi-implicit Euler).
    pub fn step(&mut self, accel: Vec2, strength: f32) {
        let magnitude = accel.length();
        let pull = if magnitude.is_finite() && magnitude > MIN_ACCEL {
            magnitude * (Self::target_angle(accel) - self.angle).sin()
        } else {
            0.0
        };
        let spring = -SPRING_MAX * strength * self.angle;
        let damping = -DAMPING * self.velocity;

        self.velocity += (pull + spring + damping) * STEP;
        self.angle += self.velocity * STEP;
    }

    /// Unit direction the needle points in, +Y up.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.sin(), -self.angle.cos())
    }
}
