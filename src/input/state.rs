//! Input map
//!
//! Debounced key and mouse state fed by the windowing layer. The engine core
//! only speaks three predicates — is-down, just-pressed, just-released —
//! plus the cursor position and scroll delta; key bindings live in gameplay
//! components.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Input state for one frame
#[derive(Debug, Default)]
pub struct Input {
    down_keys: HashSet<KeyCode>,
    just_pressed_keys: HashSet<KeyCode>,
    just_released_keys: HashSet<KeyCode>,
    down_buttons: HashSet<MouseButton>,
    just_pressed_buttons: HashSet<MouseButton>,
    just_released_buttons: HashSet<MouseButton>,
    cursor: Vec2,
    cursor_delta: Vec2,
    scroll: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the per-frame edges; called once per rendered frame after all
    /// pending ticks ran
    pub fn clear_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.just_pressed_buttons.clear();
        self.just_released_buttons.clear();
        self.cursor_delta = Vec2::ZERO;
        self.scroll = Vec2::ZERO;
    }

    /// Feed a keyboard event; repeats do not retrigger just-pressed
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.down_keys.insert(key) {
                    self.just_pressed_keys.insert(key);
                }
            }
            ElementState::Released => {
                self.down_keys.remove(&key);
                self.just_released_keys.insert(key);
            }
        }
    }

    /// Feed a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.down_buttons.insert(button) {
                    self.just_pressed_buttons.insert(button);
                }
            }
            ElementState::Released => {
                self.down_buttons.remove(&button);
                self.just_released_buttons.insert(button);
            }
        }
    }

    /// Feed a cursor move in window pixels
    pub fn handle_cursor(&mut self, position: Vec2) {
        self.cursor_delta += position - self.cursor;
        self.cursor = position;
    }

    /// Feed a scroll wheel delta
    pub fn handle_scroll(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    #[must_use]
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.down_keys.contains(&key)
    }

    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    #[must_use]
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.down_buttons.contains(&button)
    }

    #[must_use]
    pub fn is_mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed_buttons.contains(&button)
    }

    #[must_use]
    pub fn is_mouse_just_released(&self, button: MouseButton) -> bool {
        self.just_released_buttons.contains(&button)
    }

    /// Cursor position in window pixels, origin top-left
    #[must_use]
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor
    }

    /// Cursor motion since the last frame
    #[must_use]
    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    /// Scroll wheel delta this frame
    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_fires_once() {
        let mut input = Input::new();
        input.handle_key(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_key_down(KeyCode::Space));
        assert!(input.is_key_just_pressed(KeyCode::Space));

        // A key repeat while held does not retrigger the edge
        input.clear_frame();
        input.handle_key(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_key_down(KeyCode::Space));
        assert!(!input.is_key_just_pressed(KeyCode::Space));
    }

    #[test]
    fn test_release_edge() {
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        input.clear_frame();
        input.handle_key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.is_key_down(KeyCode::KeyW));
        assert!(input.is_key_just_released(KeyCode::KeyW));
    }

    #[test]
    fn test_cursor_delta_accumulates_until_clear() {
        let mut input = Input::new();
        input.handle_cursor(Vec2::new(10.0, 0.0));
        input.handle_cursor(Vec2::new(25.0, 5.0));
        assert_eq!(input.cursor_position(), Vec2::new(25.0, 5.0));
        assert_eq!(input.cursor_delta(), Vec2::new(25.0, 5.0));

        input.clear_frame();
        assert_eq!(input.cursor_delta(), Vec2::ZERO);
        assert_eq!(input.cursor_position(), Vec2::new(25.0, 5.0));
    }
}
