//! Logical action bindings
//!
//! Maps physical keys to the actions gameplay components understand, so a
//! component never names a key directly and controls can be rebound.

use rustc_hash::FxHashMap;
use winit::keyboard::KeyCode;

use super::state::Input;

/// Logical input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Interact,
    Pause,
    SaveState,
}

/// Key-to-action table owned by a gameplay component
#[derive(Debug, Clone)]
pub struct Bindings {
    map: FxHashMap<KeyCode, Action>,
}

impl Bindings {
    /// An empty table
    #[must_use]
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// WASD movement, space to fire, escape to pause
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(KeyCode::KeyW, Action::MoveUp);
        bindings.bind(KeyCode::KeyS, Action::MoveDown);
        bindings.bind(KeyCode::KeyA, Action::MoveLeft);
        bindings.bind(KeyCode::KeyD, Action::MoveRight);
        bindings.bind(KeyCode::Space, Action::Fire);
        bindings.bind(KeyCode::KeyE, Action::Interact);
        bindings.bind(KeyCode::Escape, Action::Pause);
        bindings.bind(KeyCode::F5, Action::SaveState);
        bindings
    }

    /// Bind a key to an action, replacing any previous binding for the key
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.map.insert(key, action);
    }

    /// Remove a key's binding
    pub fn unbind(&mut self, key: KeyCode) {
        self.map.remove(&key);
    }

    fn keys_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.map
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| *k)
    }

    /// Is any key bound to the action held
    #[must_use]
    pub fn is_down(&self, input: &Input, action: Action) -> bool {
        self.keys_for(action).any(|k| input.is_key_down(k))
    }

    /// Was any key bound to the action pressed this frame
    #[must_use]
    pub fn just_pressed(&self, input: &Input, action: Action) -> bool {
        self.keys_for(action).any(|k| input.is_key_just_pressed(k))
    }

    /// Was any key bound to the action released this frame
    #[must_use]
    pub fn just_released(&self, input: &Input, action: Action) -> bool {
        self.keys_for(action).any(|k| input.is_key_just_released(k))
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn test_rebinding_replaces_key() {
        let mut input = Input::new();
        let mut bindings = Bindings::with_defaults();
        bindings.bind(KeyCode::ArrowUp, Action::MoveUp);

        input.handle_key(KeyCode::ArrowUp, ElementState::Pressed);
        assert!(bindings.is_down(&input, Action::MoveUp));

        // The original WASD binding still works alongside
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(bindings.is_down(&input, Action::MoveUp));

        bindings.unbind(KeyCode::ArrowUp);
        bindings.unbind(KeyCode::KeyW);
        assert!(!bindings.is_down(&input, Action::MoveUp));
    }
}
