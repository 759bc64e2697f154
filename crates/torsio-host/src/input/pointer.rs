use glam::DVec2;
use torsio_sync::coords::Bounds;
use torsio_sync::slot::LatestCell;
use torsio_sync::{Accelerometer, MotionSample};

/// Standard gravity, m/s².
pub const GRAVITY: f64 = 9.81;

/// UI-thread side: publishes the pointer offset on every cursor move.
#[derive(Debug, Clone)]
pub struct PointerFeed {
    offset: LatestCell<DVec2>,
}

impl PointerFeed {
    pub fn new() -> Self {
        Self {
            offset: LatestCell::new(DVec2::ZERO),
        }
    }

    pub fn moved(&self, position: DVec2, bounds: Bounds) {
        self.offset.publish(bounds.offset_from_center(position));
    }

    /// Accelerometer reading this feed. `available = false` makes it report
    /// no hardware, which leaves the sampler degraded.
    pub fn accelerometer(&self, available: bool) -> PointerAccelerometer {
        PointerAccelerometer {
            offset: self.offset.clone(),
            available,
        }
    }
}

impl Default for PointerFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Accelerometer stand-in driven by the pointer's offset from the window
/// center.
pub struct PointerAccelerometer {
    offset: LatestCell<DVec2>,
    available: bool,
}

impl PointerAccelerometer {
    fn reading(offset: DVec2) -> MotionSample {
        let v = if offset.length_squared() > 1.0 {
            offset.normalize()
        } else {
            offset
        };
        MotionSample::from(v.extend(0.0) * GRAVITY)
    }
}

impl Accelerometer for PointerAccelerometer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn latest(&mut self) -> Option<MotionSample> {
        Some(Self::reading(self.offset.load()))
    }
}
