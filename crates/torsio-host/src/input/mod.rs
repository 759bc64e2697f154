//! winit input handling: strength keys, the pointer-driven accelerometer
//! and touch delivery.

mod keys;
mod pointer;
mod touch;

pub use keys::{HeldKeys, KeyAction, map_key};
pub use pointer::PointerFeed;
pub use touch::{DragTouches, map_touch_phase, to_logical, window_bounds};
