//=========================================================================
// Core Input
//
// Engine-side input state model fed by the event loop.
//
// Architecture:
// ```text
//   Core::system_update ──setters──> CoreInput ──queries──> engine code
//                                       │
//                                       └─ event log (current tick only)
// ```
//
// Responsibilities:
// - Track held keys, the three logical mouse buttons, cursor position
//   and per-event delta, joystick axes/buttons per device
// - Record every state change as a timestamped `InputEvent`
// - Derive modifier state from left/right modifier keys
//
// Notes:
// Only the thread running the event loop mutates this state. The event
// mutex is held while it does.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod joystick;

//=== Standard Library Imports ============================================

use std::collections::{BTreeMap, HashSet};
use std::fmt;

//=== External Crates =====================================================

use log::{debug, trace};

//=== Public Exports ======================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton, WheelDirection};
pub use joystick::JoystickState;

//=== CoreInput ===========================================================

/// Input state table written by the event loop.
pub struct CoreInput {
    //--- Persistent State -------------------------------------------------
    keys_down: HashSet<KeyCode>,
    mouse_buttons: [bool; 3],
    mouse_position: (f32, f32),
    mouse_delta: (f32, f32),
    joysticks: BTreeMap<usize, JoystickState>,

    //--- Event Log (cleared at the start of every tick) --------------------
    events: Vec<InputEvent>,
}

impl CoreInput {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        const EVENT_BASE: usize = 128;
        Self {
            keys_down: HashSet::new(),
            mouse_buttons: [false; 3],
            mouse_position: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            joysticks: BTreeMap::new(),
            events: Vec::with_capacity(EVENT_BASE),
        }
    }

    //=====================================================================
    // Setters (event loop only)
    //=====================================================================

    /// Records a key transition.
    pub fn set_key_state(&mut self, key: KeyCode, pressed: bool, timestamp: u32) {
        if pressed {
            self.keys_down.insert(key);
            self.events.push(InputEvent::KeyDown { key, timestamp });
        } else {
            self.keys_down.remove(&key);
            self.events.push(InputEvent::KeyUp { key, timestamp });
        }
    }

    /// Records a logical mouse button transition.
    pub fn set_mouse_button_state(&mut self, button: MouseButton, pressed: bool, timestamp: u32) {
        self.mouse_buttons[button.index()] = pressed;
        self.events.push(if pressed {
            InputEvent::MouseButtonDown { button, timestamp }
        } else {
            InputEvent::MouseButtonUp { button, timestamp }
        });
    }

    pub fn mouse_wheel_up(&mut self, timestamp: u32) {
        self.events.push(InputEvent::MouseWheel { direction: WheelDirection::Up, timestamp });
    }

    pub fn mouse_wheel_down(&mut self, timestamp: u32) {
        self.events.push(InputEvent::MouseWheel { direction: WheelDirection::Down, timestamp });
    }

    /// Stores the relative motion reported with the latest cursor move.
    pub fn set_delta_position(&mut self, dx: f32, dy: f32) {
        self.mouse_delta = (dx, dy);
    }

    pub fn set_mouse_position(&mut self, x: f32, y: f32, timestamp: u32) {
        self.mouse_position = (x, y);
        self.events.push(InputEvent::MouseMoved { x, y, timestamp });
    }

    //--- Joysticks --------------------------------------------------------

    /// Registers a device. Re-adding a known device keeps its state.
    pub fn add_joystick(&mut self, device: usize) {
        debug!(target: "platform::input", "Joystick {} added", device);
        self.joysticks.entry(device).or_default();
    }

    pub fn remove_joystick(&mut self, device: usize) {
        if self.joysticks.remove(&device).is_some() {
            debug!(target: "platform::input", "Joystick {} removed", device);
        }
    }

    /// Records an axis move. Unknown devices are registered on the fly.
    pub fn joystick_axis_moved(&mut self, axis: u32, value: f32, device: usize) {
        let value = self.joysticks.entry(device).or_default().set_axis(axis, value);
        self.events.push(InputEvent::JoystickAxis { device, axis, value });
    }

    pub fn joystick_button_down(&mut self, button: u32, device: usize) {
        self.joystick_button(button, true, device);
    }

    pub fn joystick_button_up(&mut self, button: u32, device: usize) {
        self.joystick_button(button, false, device);
    }

    fn joystick_button(&mut self, button: u32, pressed: bool, device: usize) {
        let changed = self.joysticks.entry(device).or_default().set_button(button, pressed);
        if !changed {
            trace!(target: "platform::input", "Joystick {} button {} repeated", device, button);
        }
        self.events.push(if pressed {
            InputEvent::JoystickButtonDown { device, button }
        } else {
            InputEvent::JoystickButtonUp { device, button }
        });
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns `true` while `key` is held.
    pub fn key_state(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Shift/Ctrl/Alt, each satisfied by either the left or the right key.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.key_state(KeyCode::ShiftLeft) || self.key_state(KeyCode::ShiftRight),
            ctrl: self.key_state(KeyCode::ControlLeft) || self.key_state(KeyCode::ControlRight),
            alt: self.key_state(KeyCode::AltLeft) || self.key_state(KeyCode::AltRight),
        }
    }

    pub fn mouse_button_state(&self, button: MouseButton) -> bool {
        self.mouse_buttons[button.index()]
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    pub fn joystick(&self, device: usize) -> Option<&JoystickState> {
        self.joysticks.get(&device)
    }

    /// Indices of all known devices, ascending.
    pub fn joystick_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.joysticks.keys().copied()
    }

    /// Events recorded during the current tick.
    ///
    /// `Core::system_update` clears the log before pumping, so it only
    /// holds what the latest tick produced (less anything drained since).
    /// Read it between ticks; it never grows across ticks.
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Takes all recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts a new tick: forgets the previous tick's events and keeps
    /// the allocation.
    pub(crate) fn begin_tick(&mut self) {
        self.events.clear();
    }
}

impl Default for CoreInput {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait =========================================================

impl fmt::Debug for CoreInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pressed: Vec<_> = self.keys_down.iter().map(|k| format!("{:?}", k)).collect();

        f.debug_struct("CoreInput")
            .field("mouse", &self.mouse_position)
            .field("buttons", &self.mouse_buttons)
            .field("pressed", &pressed)
            .field("joysticks", &self.joysticks.len())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn key_press_and_release_updates_state() {
        let mut input = CoreInput::new();

        input.set_key_state(KeyCode::KeyA, true, 10);
        assert!(input.key_state(KeyCode::KeyA));

        input.set_key_state(KeyCode::KeyA, false, 20);
        assert!(!input.key_state(KeyCode::KeyA));

        assert_eq!(
            input.drain_events(),
            vec![
                InputEvent::KeyDown { key: KeyCode::KeyA, timestamp: 10 },
                InputEvent::KeyUp { key: KeyCode::KeyA, timestamp: 20 },
            ]
        );
        assert!(input.events().is_empty());
    }

    #[test]
    fn begin_tick_clears_log_but_keeps_state() {
        let mut input = CoreInput::new();
        input.set_key_state(KeyCode::KeyA, true, 1);
        input.set_mouse_position(5.0, 6.0, 1);

        input.begin_tick();

        assert!(input.events().is_empty());
        assert!(input.key_state(KeyCode::KeyA));
        assert_eq!(input.mouse_position(), (5.0, 6.0));
    }

    #[test]
    fn key_up_is_recorded_even_when_not_held() {
        let mut input = CoreInput::new();
        input.set_key_state(KeyCode::KeyZ, false, 3);
        assert_eq!(input.events(), &[InputEvent::KeyUp { key: KeyCode::KeyZ, timestamp: 3 }]);
    }

    #[test]
    fn modifiers_accept_either_side() {
        let mut input = CoreInput::new();
        assert_eq!(input.modifiers(), Modifiers::NONE);

        input.set_key_state(KeyCode::ControlRight, true, 0);
        assert_eq!(input.modifiers(), Modifiers::CTRL);

        input.set_key_state(KeyCode::ShiftLeft, true, 0);
        assert_eq!(input.modifiers(), Modifiers::SHIFT_CTRL);

        input.set_key_state(KeyCode::ControlRight, false, 0);
        input.set_key_state(KeyCode::ControlLeft, true, 0);
        assert!(input.modifiers().ctrl);
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn mouse_buttons_are_tracked_per_logical_button() {
        let mut input = CoreInput::new();

        input.set_mouse_button_state(MouseButton::Right, true, 1);
        assert!(input.mouse_button_state(MouseButton::Right));
        assert!(!input.mouse_button_state(MouseButton::Left));

        input.set_mouse_button_state(MouseButton::Right, false, 2);
        assert!(!input.mouse_button_state(MouseButton::Right));
    }

    #[test]
    fn mouse_motion_records_position_and_delta() {
        let mut input = CoreInput::new();

        input.set_delta_position(3.0, -4.0);
        input.set_mouse_position(100.0, 200.0, 42);

        assert_eq!(input.mouse_position(), (100.0, 200.0));
        assert_eq!(input.mouse_delta(), (3.0, -4.0));
        assert_eq!(
            input.events(),
            &[InputEvent::MouseMoved { x: 100.0, y: 200.0, timestamp: 42 }]
        );
    }

    #[test]
    fn wheel_records_direction_only() {
        let mut input = CoreInput::new();
        input.mouse_wheel_up(1);
        input.mouse_wheel_down(2);

        assert_eq!(
            input.events(),
            &[
                InputEvent::MouseWheel { direction: WheelDirection::Up, timestamp: 1 },
                InputEvent::MouseWheel { direction: WheelDirection::Down, timestamp: 2 },
            ]
        );
    }

    //=====================================================================
    // Joystick Tests
    //=====================================================================

    #[test]
    fn joystick_state_is_keyed_by_device() {
        let mut input = CoreInput::new();
        input.add_joystick(0);
        input.add_joystick(2);

        input.joystick_axis_moved(1, -0.5, 2);
        input.joystick_button_down(4, 0);

        assert_eq!(input.joystick(2).map(|j| j.axis(1)), Some(-0.5));
        assert_eq!(input.joystick(0).map(|j| j.axis(1)), Some(0.0));
        assert_eq!(input.joystick(0).map(|j| j.is_button_pressed(4)), Some(true));
        assert_eq!(input.joystick_ids().collect::<Vec<_>>(), vec![0, 2]);

        input.joystick_button_up(4, 0);
        assert_eq!(input.joystick(0).map(|j| j.is_button_pressed(4)), Some(false));
    }

    #[test]
    fn joystick_axis_is_normalized() {
        let mut input = CoreInput::new();
        input.joystick_axis_moved(0, 2.0, 1);

        assert_eq!(
            input.events(),
            &[InputEvent::JoystickAxis { device: 1, axis: 0, value: 1.0 }]
        );
    }

    #[test]
    fn removed_joystick_is_forgotten() {
        let mut input = CoreInput::new();
        input.add_joystick(3);
        input.remove_joystick(3);
        assert!(input.joystick(3).is_none());
    }
}
