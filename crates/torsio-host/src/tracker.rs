//! Synthetic pose tracker.
//!
//! Orbits a camera around the world origin so the engine sees a moving
//! camera without tracking hardware.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec3};
use torsio_sync::{Pose, PoseSource};

const FOV_Y: f32 = 60.0 * std::f32::consts::PI / 180.0;
const Z_NEAR: f32 = 0.01;
const Z_FAR: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct OrbitTracker {
    started: Instant,
    radius: f32,
    height: f32,
    period: Duration,
    aspect: f32,
    tracking: bool,
}

impl OrbitTracker {
    pub fn new(aspect: f32) -> Self {
        Self::starting_at(Instant::now(), aspect)
    }

    pub fn starting_at(started: Instant, aspect: f32) -> Self {
        Self {
            started,
            radius: 1.5,
            height: 0.6,
            period: Duration::from_secs(20),
            aspect: sanitize_aspect(aspect).unwrap_or(1.0),
            tracking: true,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if let Some(aspect) = sanitize_aspect(aspect) {
            self.aspect = aspect;
        }
    }

    /// Flips tracking availability; returns the new state.
    pub fn toggle_tracking(&mut self) -> bool {
        self.tracking = !self.tracking;
        log::info!("tracking {}", if self.tracking { "resumed" } else { "lost" });
        self.tracking
    }

    /// Pose at `now`.
    pub fn pose_at(&self, now: Instant) -> Pose {
        let t = now.saturating_duration_since(self.started).as_secs_f32();
        let angle = TAU * t / self.period.as_secs_f32();
        let eye = Vec3::new(
            self.radius * angle.cos(),
            self.height,
            self.radius * angle.sin(),
        );

        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(FOV_Y, self.aspect, Z_NEAR, Z_FAR);
        Pose::new(view, projection, view.inverse())
    }
}

fn sanitize_aspect(aspect: f32) -> Option<f32> {
    (aspect.is_finite() && aspect > 0.0).then_some(aspect)
}

impl PoseSource for OrbitTracker {
    fn tracking_available(&self) -> bool {
        self.tracking
    }

    fn next_pose(&mut self) -> Option<Pose> {
        Some(self.pose_at(Instant::now()))
    }
}
