use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Host actions bound to keys.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyAction {
    /// Raise the strength while held.
    Raise,
    /// Lower the strength while held.
    Lower,
    /// Toggle tracking availability (on press).
    ToggleTracking,
    Exit,
}

pub fn map_key(key: PhysicalKey) -> Option<KeyAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    Some(match code {
        KeyCode::ArrowUp | KeyCode::ArrowRight => KeyAction::Raise,
        KeyCode::ArrowDown | KeyCode::ArrowLeft => KeyAction::Lower,
        KeyCode::KeyT => KeyAction::ToggleTracking,
        KeyCode::Escape => KeyAction::Exit,
        _ => return None,
    })
}

/// Keys currently held down.
#[derive(Debug, Default)]
pub struct HeldKeys {
    down: HashSet<KeyCode>,
}

impl HeldKeys {
    /// Records a transition. Returns true on a fresh press (not a repeat).
    pub fn apply(&mut self, key: PhysicalKey, state: ElementState) -> bool {
        let PhysicalKey::Code(code) = key else {
            return false;
        };
        match state {
            ElementState::Pressed => self.down.insert(code),
            ElementState::Released => {
                self.down.remove(&code);
                false
            }
        }
    }

    /// Forget everything, e.g. on focus loss, so no key stays stuck.
    pub fn clear(&mut self) {
        self.down.clear();
    }

    fn holding(&self, action: KeyAction) -> bool {
        self.down
            .iter()
            .any(|code| map_key(PhysicalKey::Code(*code)) == Some(action))
    }

    /// Strength change for one refresh: raising wins when both directions
    /// are held.
    pub fn strength_delta(&self, step: f32) -> f32 {
        if self.holding(KeyAction::Raise) {
            step
        } else if self.holding(KeyAction::Lower) {
            -step
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(c: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(c)
    }

    #[test]
    fn arrows_map_to_strength_actions() {
        assert_eq!(map_key(code(KeyCode::ArrowUp)), Some(KeyAction::Raise));
        assert_eq!(map_key(code(KeyCode::ArrowRight)), Some(KeyAction::Raise));
        assert_eq!(map_key(code(KeyCode::ArrowDown)), Some(KeyAction::Lower));
        assert_eq!(map_key(code(KeyCode::ArrowLeft)), Some(KeyAction::Lower));
        assert_eq!(map_key(code(KeyCode::KeyA)), None);
    }

    #[test]
    fn held_keys_drive_delta() {
        let mut keys = HeldKeys::default();
        assert_eq!(keys.strength_delta(0.01), 0.0);

        assert!(keys.apply(code(KeyCode::ArrowLeft), ElementState::Pressed));
        assert_eq!(keys.strength_delta(0.01), -0.01);

        keys.apply(code(KeyCode::ArrowUp), ElementState::Pressed);
        assert_eq!(keys.strength_delta(0.01), 0.01);

        keys.apply(code(KeyCode::ArrowUp), ElementState::Released);
        keys.apply(code(KeyCode::ArrowLeft), ElementState::Released);
        assert_eq!(keys.strength_delta(0.01), 0.0);
    }

    #[test]
    fn repeats_are_not_fresh_presses() {
        let mut keys = HeldKeys::default();
        assert!(keys.apply(code(KeyCode::KeyT), ElementState::Pressed));
        assert!(!keys.apply(code(KeyCode::KeyT), ElementState::Pressed));
    }

    #[test]
    fn clear_releases_everything() {
        let mut keys = HeldKeys::default();
        keys.apply(code(KeyCode::ArrowRight), ElementState::Pressed);
        keys.clear();
        assert_eq!(keys.strength_delta(0.01), 0.0);
    }
}
