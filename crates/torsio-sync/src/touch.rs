//! Touch observation.

use std::fmt;

use glam::DVec2;

use crate::coords::Bounds;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
}

impl fmt::Display for TouchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Began => "began",
            Self::Moved => "moved",
            Self::Ended => "ended",
        })
    }
}

/// A single touch as delivered by the host: location and the bounds of the
/// view it landed in, both in points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub location: DVec2,
    pub bounds: Bounds,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, location: DVec2, bounds: Bounds) -> Self {
        Self {
            phase,
            location,
            bounds,
        }
    }
}
