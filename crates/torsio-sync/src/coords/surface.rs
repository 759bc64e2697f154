/// Drawable surface size as reported by the host's resize events.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Non-zero, finite extent. Zero-sized surfaces occur while minimized.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, or `None` for an invalid size.
    #[inline]
    pub fn aspect(self) -> Option<f64> {
        self.is_valid().then(|| self.width / self.height)
    }
}
