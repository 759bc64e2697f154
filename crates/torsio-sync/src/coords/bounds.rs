use glam::DVec2;

/// Axis-aligned rectangle in points (top-left origin), e.g. the view bounds
/// delivered alongside a touch.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds {
    pub origin: DVec2,
    pub size: DVec2,
}

impl Bounds {
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Same rectangle with non-negative width/height.
    #[inline]
    pub fn normalized(self) -> Self {
        let min = self.origin.min(self.origin + self.size);
        Self {
            origin: min,
            size: self.size.abs(),
        }
    }

    #[inline]
    pub fn center(self) -> DVec2 {
        self.origin + self.size * 0.5
    }

    /// Offset of `p` from the center, divided by the longer edge, with +Y
    /// pointing up. A point on the middle of the longer edge maps to length 0.5.
    ///
    /// Returns zero for empty bounds.
    pub fn offset_from_center(self, p: DVec2) -> DVec2 {
        let b = self.normalized();
        let edge = b.size.x.max(b.size.y);
        if b.is_empty() || !edge.is_finite() {
            return DVec2::ZERO;
        }
        let d = p - b.center();
        DVec2::new(d.x / edge, -d.y / edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x: f64, y: f64, w: f64, h: f64) -> Bounds { Bounds::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let bounds = b(1.0, 2.0, 10.0, 20.0);
        assert_eq!(bounds.normalized(), bounds);
    }

    #[test]
    fn normalized_negative_extent() {
        let n = b(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, b(6.0, 7.0, 4.0, 3.0));
    }

    // ── offset_from_center ────────────────────────────────────────────────

    #[test]
    fn center_maps_to_zero() {
        let bounds = b(0.0, 0.0, 1152.0, 768.0);
        assert_eq!(bounds.offset_from_center(DVec2::new(576.0, 384.0)), DVec2::ZERO);
    }

    #[test]
    fn offset_uses_longer_edge_and_flips_y() {
        let bounds = b(0.0, 0.0, 1000.0, 500.0);
        // Right edge midpoint.
        assert_eq!(bounds.offset_from_center(DVec2::new(1000.0, 250.0)), DVec2::new(0.5, 0.0));
        // Top edge midpoint: up is positive.
        assert_eq!(bounds.offset_from_center(DVec2::new(500.0, 0.0)), DVec2::new(0.0, 0.25));
    }

    #[test]
    fn empty_bounds_give_zero_offset() {
        assert_eq!(b(0.0, 0.0, 0.0, 10.0).offset_from_center(DVec2::new(3.0, 3.0)), DVec2::ZERO);
    }
}
