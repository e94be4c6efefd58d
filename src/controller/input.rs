/// Keyboard state and key bindings
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Input events the frame loop cares about, decoupled from winit's event types
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode, repeat: bool },
    KeyUp(KeyCode),
    FocusLost,
}

/// Per-tick movement intent handed to the physics system
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Requested heading in degrees, `None` when no direction is held
    pub heading: Option<f32>,
    /// Jump key went down this frame
    pub jump_pressed: bool,
}

#[derive(Default)]
pub struct InputState {
    pub pressed_keys: HashSet<KeyCode>,
    /// Keys that went down since the last `end_frame`
    pub just_pressed: HashSet<KeyCode>,
    pub show_debug: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, repeat } => {
                if self.pressed_keys.insert(*key) && !repeat {
                    self.just_pressed.insert(*key);
                }
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key);
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
        }
    }

    /// Apply an event the UI may already have claimed. Presses claimed by
    /// the UI are dropped; releases and focus loss always apply so no key
    /// stays held. Returns whether the event reached the game.
    pub fn process_shared_event(&mut self, event: &InputEvent, consumed_by_ui: bool) -> bool {
        if consumed_by_ui && matches!(event, InputEvent::KeyDown { .. }) {
            return false;
        }
        self.process_event(event);
        true
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
        self.just_pressed.clear();
    }

    /// Forget this frame's presses; call once the tick has consumed them
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    pub fn toggle_debug(&mut self) {
        self.show_debug = !self.show_debug;
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub forward_alt: KeyCode,
    pub backward_alt: KeyCode,
    pub left_alt: KeyCode,
    pub right_alt: KeyCode,
    pub jump: KeyCode,
    pub toggle_debug: KeyCode,
    pub quit: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            forward_alt: KeyCode::ArrowUp,
            backward_alt: KeyCode::ArrowDown,
            left_alt: KeyCode::ArrowLeft,
            right_alt: KeyCode::ArrowRight,
            jump: KeyCode::Space,
            toggle_debug: KeyCode::F1,
            quit: KeyCode::Escape,
        }
    }
}

/// High-level input processor
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn is_moving_forward(&self, input: &InputState) -> bool {
        input.is_key_down(self.bindings.forward) || input.is_key_down(self.bindings.forward_alt)
    }

    pub fn is_moving_backward(&self, input: &InputState) -> bool {
        input.is_key_down(self.bindings.backward) || input.is_key_down(self.bindings.backward_alt)
    }

    pub fn is_moving_left(&self, input: &InputState) -> bool {
        input.is_key_down(self.bindings.left) || input.is_key_down(self.bindings.left_alt)
    }

    pub fn is_moving_right(&self, input: &InputState) -> bool {
        input.is_key_down(self.bindings.right) || input.is_key_down(self.bindings.right_alt)
    }

    pub fn wants_to_jump(&self, input: &InputState) -> bool {
        input.was_pressed(self.bindings.jump)
    }

    pub fn wants_to_toggle_debug(&self, key: KeyCode) -> bool {
        key == self.bindings.toggle_debug
    }

    pub fn is_quit(&self, key: KeyCode) -> bool {
        key == self.bindings.quit
    }

    /// Heading in degrees for the held direction keys.
    ///
    /// Diagonals win over single directions; among diagonals and among single
    /// directions the first match in clockwise order from forward wins.
    pub fn heading(&self, input: &InputState) -> Option<f32> {
        let f = self.is_moving_forward(input);
        let b = self.is_moving_backward(input);
        let l = self.is_moving_left(input);
        let r = self.is_moving_right(input);

        if f && r {
            Some(45.0)
        } else if r && b {
            Some(135.0)
        } else if b && l {
            Some(225.0)
        } else if l && f {
            Some(315.0)
        } else if f {
            Some(0.0)
        } else if r {
            Some(90.0)
        } else if b {
            Some(180.0)
        } else if l {
            Some(270.0)
        } else {
            None
        }
    }

    pub fn frame_input(&self, input: &InputState) -> FrameInput {
        FrameInput {
            heading: self.heading(input),
            jump_pressed: self.wants_to_jump(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &[KeyCode]) -> InputState {
        let mut state = InputState::new();
        for key in keys {
            state.process_event(&InputEvent::KeyDown { key: *key, repeat: false });
        }
        state
    }

    #[test]
    fn single_and_diagonal_headings() {
        let p = InputProcessor::default();
        assert_eq!(p.heading(&held(&[])), None);
        assert_eq!(p.heading(&held(&[KeyCode::KeyW])), Some(0.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyD])), Some(90.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyS])), Some(180.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyA])), Some(270.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyW, KeyCode::KeyD])), Some(45.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyD, KeyCode::KeyS])), Some(135.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyS, KeyCode::KeyA])), Some(225.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyA, KeyCode::KeyW])), Some(315.0));
    }

    #[test]
    fn opposing_keys_resolve_by_priority() {
        let p = InputProcessor::default();
        assert_eq!(p.heading(&held(&[KeyCode::KeyW, KeyCode::KeyS])), Some(0.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyA, KeyCode::KeyD])), Some(90.0));
        // Three keys: forward+right is checked first
        assert_eq!(p.heading(&held(&[KeyCode::KeyW, KeyCode::KeyD, KeyCode::KeyS])), Some(45.0));
    }

    #[test]
    fn arrow_keys_mirror_wasd() {
        let p = InputProcessor::default();
        assert_eq!(p.heading(&held(&[KeyCode::ArrowUp, KeyCode::ArrowRight])), Some(45.0));
        assert_eq!(p.heading(&held(&[KeyCode::ArrowLeft])), Some(270.0));
    }

    #[test]
    fn jump_is_edge_triggered() {
        let p = InputProcessor::default();
        let mut state = held(&[KeyCode::Space]);
        assert!(p.frame_input(&state).jump_pressed);

        state.end_frame();
        assert!(!p.frame_input(&state).jump_pressed);

        // OS key repeat while held is not a new press
        state.process_event(&InputEvent::KeyDown { key: KeyCode::Space, repeat: true });
        assert!(!p.frame_input(&state).jump_pressed);

        state.process_event(&InputEvent::KeyUp(KeyCode::Space));
        state.process_event(&InputEvent::KeyDown { key: KeyCode::Space, repeat: false });
        assert!(p.frame_input(&state).jump_pressed);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let p = InputProcessor::default();
        let mut state = held(&[KeyCode::KeyW, KeyCode::Space]);
        state.process_event(&InputEvent::FocusLost);
        assert_eq!(p.frame_input(&state), FrameInput::default());
    }

    #[test]
    fn custom_bindings() {
        let bindings = KeyBindings { forward: KeyCode::KeyZ, ..KeyBindings::default() };
        let p = InputProcessor::new(bindings);
        assert_eq!(p.heading(&held(&[KeyCode::KeyZ])), Some(0.0));
        assert_eq!(p.heading(&held(&[KeyCode::KeyW])), None);
        assert!(p.is_quit(KeyCode::Escape));
        assert!(p.wants_to_toggle_debug(KeyCode::F1));
    }

    #[test]
    fn ui_claimed_release_still_lifts_key() {
        let mut state = InputState::new();
        state.process_event(&InputEvent::KeyDown { key: KeyCode::KeyW, repeat: false });
        assert!(state.process_shared_event(&InputEvent::KeyUp(KeyCode::KeyW), true));
        assert!(!state.is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn ui_claimed_press_is_ignored() {
        let mut state = InputState::new();
        let down = InputEvent::KeyDown { key: KeyCode::KeyD, repeat: false };
        assert!(!state.process_shared_event(&down, true));
        assert!(!state.is_key_down(KeyCode::KeyD));
        assert!(!state.was_pressed(KeyCode::KeyD));

        assert!(state.process_shared_event(&down, false));
        assert!(state.is_key_down(KeyCode::KeyD));
    }
}
