use glam::DVec2;
use torsio_sync::coords::Bounds;
use torsio_sync::touch::{TouchEvent, TouchPhase};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, TouchPhase as WinitTouchPhase};
use winit::window::Window;

pub fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> DVec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    DVec2::new(logical.x, logical.y)
}

/// The window's content area in logical points.
pub fn window_bounds(window: &Window) -> Bounds {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    Bounds::new(0.0, 0.0, size.width, size.height)
}

pub fn map_touch_phase(phase: WinitTouchPhase) -> TouchPhase {
    match phase {
        WinitTouchPhase::Started => TouchPhase::Began,
        WinitTouchPhase::Moved => TouchPhase::Moved,
        WinitTouchPhase::Ended | WinitTouchPhase::Cancelled => TouchPhase::Ended,
    }
}

/// Turns left-button drags into touch events.
///
/// A drag only starts inside the window, but a release anywhere ends it at
/// the last position the window saw.
#[derive(Debug, Default)]
pub struct DragTouches {
    last: Option<DVec2>,
    inside: bool,
    dragging: bool,
}

impl DragTouches {
    pub fn cursor_moved(&mut self, position: DVec2, bounds: Bounds) -> Option<TouchEvent> {
        self.last = Some(position);
        self.inside = true;
        self.dragging
            .then(|| TouchEvent::new(TouchPhase::Moved, position, bounds))
    }

    pub fn cursor_left(&mut self) {
        self.inside = false;
    }

    pub fn left_button(&mut self, state: ElementState, bounds: Bounds) -> Option<TouchEvent> {
        let position = self.last?;
        match (state, self.dragging) {
            (ElementState::Pressed, false) if self.inside => {
                self.dragging = true;
                Some(TouchEvent::new(TouchPhase::Began, position, bounds))
            }
            (ElementState::Released, true) => {
                self.dragging = false;
                Some(TouchEvent::new(TouchPhase::Ended, position, bounds))
            }
            _ => None,
        }
    }
}
