//! Torsional spring strength, shared between the UI and the render thread.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Lower bound of the parameter.
pub const STRENGTH_MIN: f32 = 0.0;
/// Upper bound of the parameter.
pub const STRENGTH_MAX: f32 = 1.0;

/// Handle to the shared scalar. Clones refer to the same value.
///
/// The value is stored as `f32` bits in an atomic, so reads and writes are
/// lock-free and never torn. Writes are clamped here rather than trusting
/// the UI control to stay in range.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    bits: Arc<AtomicU32>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(STRENGTH_MIN)
    }
}

impl ParameterStore {
    pub fn new(initial: f32) -> Self {
        let initial = if initial.is_nan() { STRENGTH_MIN } else { clamp(initial) };
        Self {
            bits: Arc::new(AtomicU32::new(initial.to_bits())),
        }
    }

    /// Current value, always within `[STRENGTH_MIN, STRENGTH_MAX]`.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Stores `value` clamped into range and returns what was stored.
    ///
    /// NaN is rejected: the previous value is kept.
    pub fn set(&self, value: f32) -> f32 {
        if value.is_nan() {
            log::warn!("ignoring NaN torsional spring strength");
            return self.get();
        }
        let clamped = clamp(value);
        if clamped != value {
            log::debug!("torsional spring strength {value} clamped to {clamped}");
        }
        self.bits.store(clamped.to_bits(), Ordering::Release);
        clamped
    }

    /// Adds `delta` atomically, clamps, and returns the new value.
    pub fn nudge(&self, delta: f32) -> f32 {
        if delta.is_nan() {
            log::warn!("ignoring NaN torsional spring strength delta");
            return self.get();
        }
        let mut next = 0.0;
        // The closure always returns Some, so this cannot fail.
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                next = clamp(f32::from_bits(bits) + delta);
                Some(next.to_bits())
            });
        next
    }
}

#[inline]
fn clamp(value: f32) -> f32 {
    value.clamp(STRENGTH_MIN, STRENGTH_MAX)
}
