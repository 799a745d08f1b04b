//! Input state tracking
//!
//! The platform layer feeds key and mouse transitions in; the editor
//! queries held state and per-frame pressed edges by symbolic code.

use std::collections::HashSet;
use tracing::trace;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Tracks the current state of input devices
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Currently held keys
    keys_down: HashSet<KeyCode>,
    /// Keys held last frame, for edge detection
    prev_keys_down: HashSet<KeyCode>,
    /// Currently held mouse buttons
    buttons_down: HashSet<MouseButton>,
    /// Buttons held last frame
    prev_buttons_down: HashSet<MouseButton>,
    /// Mouse position in viewport coordinates
    pub mouse_position: (f32, f32),
    /// Mouse wheel movement this frame
    pub wheel_delta: f32,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot held state for edge detection; call once at frame start
    pub fn begin_frame(&mut self) {
        self.prev_keys_down = self.keys_down.clone();
        self.prev_buttons_down = self.buttons_down.clone();
        self.wheel_delta = 0.0;
    }

    /// Record a key transition
    pub fn set_key(&mut self, key: KeyCode, down: bool) {
        if down {
            self.keys_down.insert(key);
            trace!("key down: {:?}", key);
        } else {
            self.keys_down.remove(&key);
            trace!("key up: {:?}", key);
        }
    }

    /// Record a mouse button transition
    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        if down {
            self.buttons_down.insert(button);
        } else {
            self.buttons_down.remove(&button);
        }
    }

    /// Update mouse position
    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse_position = (x, y);
    }

    /// Accumulate wheel movement
    pub fn add_wheel_delta(&mut self, delta: f32) {
        self.wheel_delta += delta;
    }

    /// Whether a key is currently held
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Whether a key went down this frame
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key) && !self.prev_keys_down.contains(&key)
    }

    /// Whether a mouse button is currently held
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Whether a mouse button went down this frame
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button) && !self.prev_buttons_down.contains(&button)
    }

    /// Whether either control key is held
    pub fn ctrl_down(&self) -> bool {
        self.key_down(KeyCode::ControlLeft) || self.key_down(KeyCode::ControlRight)
    }

    /// Whether either alt key is held
    pub fn alt_down(&self) -> bool {
        self.key_down(KeyCode::AltLeft) || self.key_down(KeyCode::AltRight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_and_pressed_edge() {
        let mut state = InputState::new();

        state.begin_frame();
        state.set_key(KeyCode::KeyW, true);
        assert!(state.key_down(KeyCode::KeyW));
        assert!(state.key_pressed(KeyCode::KeyW));

        // Still held next frame, but no longer an edge
        state.begin_frame();
        assert!(state.key_down(KeyCode::KeyW));
        assert!(!state.key_pressed(KeyCode::KeyW));

        state.set_key(KeyCode::KeyW, false);
        assert!(!state.key_down(KeyCode::KeyW));
    }

    #[test]
    fn test_button_pressed_edge() {
        let mut state = InputState::new();

        state.begin_frame();
        state.set_button(MouseButton::Left, true);
        assert!(state.button_pressed(MouseButton::Left));

        state.begin_frame();
        assert!(state.button_down(MouseButton::Left));
        assert!(!state.button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_modifier_helpers() {
        let mut state = InputState::new();
        state.set_key(KeyCode::ControlLeft, true);
        assert!(state.ctrl_down());
        assert!(!state.alt_down());

        state.set_key(KeyCode::AltRight, true);
        assert!(state.alt_down());
    }

    #[test]
    fn test_mouse_position_and_wheel() {
        let mut state = InputState::new();
        state.set_mouse_position(100.0, 200.0);
        assert_eq!(state.mouse_position, (100.0, 200.0));

        state.add_wheel_delta(1.5);
        state.add_wheel_delta(-0.5);
        assert_eq!(state.wheel_delta, 1.0);

        state.begin_frame();
        assert_eq!(state.wheel_delta, 0.0);
    }
}
