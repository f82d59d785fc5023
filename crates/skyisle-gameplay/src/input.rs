//! Input handling for the player's controls.
//!
//! Raw key states come in as a table of held keys once per frame; bindings
//! map keys to actions, and [`InputManager::process`] condenses the actions
//! into the [`FrameInput`] the simulation consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// Space bar
    Space,
    /// Left shift
    LShift,
    /// Left control
    LCtrl,
}

/// State of a key (pressed, just pressed, released).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the key is currently held down
    pub pressed: bool,
    /// Whether the key went down this frame
    pub just_pressed: bool,
    /// Whether the key went up this frame
    pub just_released: bool,
}

impl ButtonState {
    /// Update the state based on whether the key is currently held.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }

    /// Clear the edge flags.
    pub fn clear_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Game actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move toward -y (Up arrow)
    MoveUp,
    /// Move toward +y (Down arrow)
    MoveDown,
    /// Move toward -x (Left arrow, A)
    MoveLeft,
    /// Move toward +x (Right arrow, D)
    MoveRight,
    /// Take off or climb (W)
    Ascend,
    /// Sink or land (S)
    Descend,
    /// Fly faster (Left shift)
    Boost,
    /// Fly slower (Left control)
    Brake,
    /// Talk to a nearby NPC (E)
    Interact,
    /// Shoot (Space)
    Fire,
}

/// Key binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Primary key for this action
    pub primary: KeyCode,
    /// Optional secondary key
    pub secondary: Option<KeyCode>,
}

impl KeyBinding {
    /// Create a binding with only a primary key.
    #[must_use]
    pub const fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Create a binding with primary and secondary keys.
    #[must_use]
    pub const fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Check if a key matches this binding.
    #[must_use]
    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }
}

/// Condensed per-frame input for the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Horizontal intent: -1, 0 or 1
    pub dx: i8,
    /// Vertical intent: -1, 0 or 1
    pub dy: i8,
    /// Ascend held
    pub ascend: bool,
    /// Descend held
    pub descend: bool,
    /// Boost held
    pub boost: bool,
    /// Brake held
    pub brake: bool,
    /// Interact went down this frame
    pub interact: bool,
    /// Fire went down this frame
    pub fire: bool,
}

impl FrameInput {
    /// Input with only a movement intent.
    #[must_use]
    pub const fn moving(dx: i8, dy: i8) -> Self {
        Self {
            dx,
            dy,
            ascend: false,
            descend: false,
            boost: false,
            brake: false,
            interact: false,
            fire: false,
        }
    }

    /// Whether any direction is held.
    #[must_use]
    pub const fn has_movement(&self) -> bool {
        self.dx != 0 || self.dy != 0
    }
}

/// Turns raw key states into [`FrameInput`].
#[derive(Debug)]
pub struct InputManager {
    key_states: HashMap<KeyCode, ButtonState>,
    bindings: HashMap<Action, KeyBinding>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Create a new input manager with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self {
            key_states: HashMap::new(),
            bindings: HashMap::new(),
        };
        manager.set_default_bindings();
        manager
    }

    /// Set default key bindings.
    pub fn set_default_bindings(&mut self) {
        self.bindings.clear();
        self.bindings.insert(Action::MoveUp, KeyBinding::new(KeyCode::Up));
        self.bindings
            .insert(Action::MoveDown, KeyBinding::new(KeyCode::Down));
        self.bindings.insert(
            Action::MoveLeft,
            KeyBinding::with_secondary(KeyCode::Left, KeyCode::A),
        );
        self.bindings.insert(
            Action::MoveRight,
            KeyBinding::with_secondary(KeyCode::Right, KeyCode::D),
        );
        self.bindings.insert(Action::Ascend, KeyBinding::new(KeyCode::W));
        self.bindings.insert(Action::Descend, KeyBinding::new(KeyCode::S));
        self.bindings
            .insert(Action::Boost, KeyBinding::new(KeyCode::LShift));
        self.bindings
            .insert(Action::Brake, KeyBinding::new(KeyCode::LCtrl));
        self.bindings
            .insert(Action::Interact, KeyBinding::new(KeyCode::E));
        self.bindings
            .insert(Action::Fire, KeyBinding::new(KeyCode::Space));
    }

    /// Rebind an action to a new key.
    pub fn rebind(&mut self, action: Action, binding: KeyBinding) {
        self.bindings.insert(action, binding);
    }

    /// Get the current binding for an action.
    #[must_use]
    pub fn get_binding(&self, action: Action) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Update a single key.
    pub fn update_key(&mut self, key: KeyCode, is_pressed: bool) {
        self.key_states.entry(key).or_default().update(is_pressed);
    }

    /// Replace the whole key table: listed keys are held, all others released.
    pub fn set_pressed_keys(&mut self, held: &[KeyCode]) {
        for key in held {
            self.key_states.entry(*key).or_default();
        }
        for (key, state) in &mut self.key_states {
            state.update(held.contains(key));
        }
    }

    /// Clear edge flags. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        for state in self.key_states.values_mut() {
            state.clear_frame();
        }
    }

    /// Check if a key is currently pressed.
    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.key_states.get(&key).is_some_and(|state| state.pressed)
    }

    /// Check if a key was just pressed this frame.
    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.key_states
            .get(&key)
            .is_some_and(|state| state.just_pressed)
    }

    /// Check if an action is currently active.
    #[must_use]
    pub fn is_action_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_pressed(key))
        })
    }

    /// Check if an action was just pressed this frame.
    #[must_use]
    pub fn is_action_just_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_just_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_just_pressed(key))
        })
    }

    /// Process raw key states into a [`FrameInput`].
    #[must_use]
    pub fn process(&self) -> FrameInput {
        let axis = |negative: Action, positive: Action| -> i8 {
            i8::from(self.is_action_pressed(positive)) - i8::from(self.is_action_pressed(negative))
        };

        FrameInput {
            dx: axis(Action::MoveLeft, Action::MoveRight),
            dy: axis(Action::MoveUp, Action::MoveDown),
            ascend: self.is_action_pressed(Action::Ascend),
            descend: self.is_action_pressed(Action::Descend),
            boost: self.is_action_pressed(Action::Boost),
            brake: self.is_action_pressed(Action::Brake),
            interact: self.is_action_just_pressed(Action::Interact),
            fire: self.is_action_just_pressed(Action::Fire),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_state() {
        let mut state = ButtonState::default();
        state.update(true);
        assert!(state.pressed);
        assert!(state.just_pressed);

        state.clear_frame();
        state.update(true);
        assert!(state.pressed);
        assert!(!state.just_pressed);

        state.clear_frame();
        state.update(false);
        assert!(!state.pressed);
        assert!(state.just_released);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut manager = InputManager::new();
        manager.set_pressed_keys(&[KeyCode::Left, KeyCode::Right, KeyCode::Up]);
        let input = manager.process();
        assert_eq!(input.dx, 0);
        assert_eq!(input.dy, -1);
        assert!(input.has_movement());
    }

    #[test]
    fn test_interact_fires_on_edge_only() {
        let mut manager = InputManager::new();

        manager.set_pressed_keys(&[KeyCode::E, KeyCode::Space]);
        let first = manager.process();
        assert!(first.interact);
        assert!(first.fire);
        manager.end_frame();

        manager.set_pressed_keys(&[KeyCode::E, KeyCode::Space]);
        let held = manager.process();
        assert!(!held.interact);
        assert!(!held.fire);
        manager.end_frame();

        manager.set_pressed_keys(&[]);
        manager.end_frame();
        manager.set_pressed_keys(&[KeyCode::E]);
        assert!(manager.process().interact);
    }

    #[test]
    fn test_key_table_releases_missing_keys() {
        let mut manager = InputManager::new();
        manager.set_pressed_keys(&[KeyCode::W, KeyCode::Right]);
        assert!(manager.process().ascend);
        manager.end_frame();

        manager.set_pressed_keys(&[KeyCode::Right]);
        let input = manager.process();
        assert!(!input.ascend);
        assert_eq!(input.dx, 1);
    }

    #[test]
    fn test_rebind() {
        let mut manager = InputManager::new();
        manager.rebind(Action::Fire, KeyBinding::new(KeyCode::Q));
        manager.update_key(KeyCode::Space, true);
        assert!(!manager.process().fire);
        manager.update_key(KeyCode::Q, true);
        assert!(manager.process().fire);
        assert!(manager
            .get_binding(Action::MoveLeft)
            .is_some_and(|b| b.matches(KeyCode::A)));
    }
}
