//=========================================================================
// Input Event Types
//
// Engine-side representation of keyboard, mouse and joystick input.
//
// This module abstracts away backend-specific input (winit, gilrs) into
// a portable format consumed by `CoreInput` and read by the rest of the
// engine.
//
// Event Flow:
// ```text
// Native Backend (winit / gilrs)
//         ↓
//    NativeEvent (platform module)
//         ↓
//    Core::system_update (shortcut check, timestamps)
//         ↓
//    CoreInput (state table + InputEvent log, this module's types)
// ```
//
// Design:
// - Key, button and direction enums are `Copy` and hashable
// - Every recorded event carries the core tick (milliseconds since
//   startup) it was observed on, except joystick events which the
//   native layer does not timestamp
//
//=========================================================================

//=== MouseButton =========================================================

/// Logical mouse button.
///
/// Exactly three logical buttons exist. Native side/thumb buttons have no
/// logical counterpart and are dropped by the input bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,
}

impl MouseButton {
    /// All logical buttons in table order.
    pub const ALL: [MouseButton; 3] = [Self::Left, Self::Right, Self::Middle];

    /// Index into the three-slot button table.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
        }
    }
}

//=== WheelDirection ======================================================

/// Mouse wheel direction. Wheel events never carry a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelDirection {
    Up,
    Down,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Left and right modifier keys are distinct so the shortcut check can
/// accept either side of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Modifier Keys ----------------------------------------------------

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,

    //--- Navigation & Editing ---------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    CapsLock,

    //--- Punctuation ------------------------------------------------------

    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Backquote,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Derived from the key state table: a modifier is held when either its
/// left or its right key is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right).
    pub ctrl: bool,

    /// Alt key held (either left or right).
    pub alt: bool,
}

//--- Modifier Constants --------------------------------------------------

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// Shift + Ctrl.
    pub const SHIFT_CTRL: Self = Self { shift: true, ctrl: true, alt: false };

    /// All modifiers held (Shift + Ctrl + Alt).
    pub const ALL: Self = Self { shift: true, ctrl: true, alt: true };
}

impl Default for Modifiers {
    /// Defaults to no modifiers held.
    fn default() -> Self {
        Self::NONE
    }
}

//=== InputEvent ==========================================================

/// One recorded input state change.
///
/// `timestamp` is the core tick in milliseconds since startup.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Key pressed down (not emitted for keys consumed as shortcuts).
    KeyDown { key: KeyCode, timestamp: u32 },

    /// Key released. Always emitted, even for consumed shortcut keys.
    KeyUp { key: KeyCode, timestamp: u32 },

    /// Logical mouse button pressed.
    MouseButtonDown { button: MouseButton, timestamp: u32 },

    /// Logical mouse button released.
    MouseButtonUp { button: MouseButton, timestamp: u32 },

    /// Cursor moved; position in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32, timestamp: u32 },

    /// Wheel scrolled one notch in `direction`.
    MouseWheel { direction: WheelDirection, timestamp: u32 },

    /// Joystick axis moved; `value` is normalized to [-1, 1].
    JoystickAxis { device: usize, axis: u32, value: f32 },

    /// Joystick button pressed.
    JoystickButtonDown { device: usize, button: u32 },

    /// Joystick button released.
    JoystickButtonUp { device: usize, button: u32 },
}

impl InputEvent {
    /// Core tick the event was recorded on, if the event is timestamped.
    pub fn timestamp(&self) -> Option<u32> {
        match *self {
            Self::KeyDown { timestamp, .. }
            | Self::KeyUp { timestamp, .. }
            | Self::MouseButtonDown { timestamp, .. }
            | Self::MouseButtonUp { timestamp, .. }
            | Self::MouseMoved { timestamp, .. }
            | Self::MouseWheel { timestamp, .. } => Some(timestamp),
            Self::JoystickAxis { .. }
            | Self::JoystickButtonDown { .. }
            | Self::JoystickButtonUp { .. } => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // MouseButton Tests
    //=====================================================================

    #[test]
    fn mouse_button_indices_are_distinct() {
        let indices: Vec<usize> = MouseButton::ALL.iter().map(|b| b.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    //=====================================================================
    // InputEvent Tests
    //=====================================================================

    #[test]
    fn keyboard_and_mouse_events_are_timestamped() {
        let events = [
            InputEvent::KeyDown { key: KeyCode::KeyA, timestamp: 5 },
            InputEvent::KeyUp { key: KeyCode::KeyA, timestamp: 6 },
            InputEvent::MouseButtonDown { button: MouseButton::Left, timestamp: 7 },
            InputEvent::MouseMoved { x: 1.0, y: 2.0, timestamp: 8 },
            InputEvent::MouseWheel { direction: WheelDirection::Up, timestamp: 9 },
        ];

        let stamps: Vec<_> = events.iter().map(InputEvent::timestamp).collect();
        assert_eq!(stamps, vec![Some(5), Some(6), Some(7), Some(8), Some(9)]);
    }

    #[test]
    fn joystick_events_have_no_timestamp() {
        let event = InputEvent::JoystickAxis { device: 0, axis: 1, value: 0.5 };
        assert_eq!(event.timestamp(), None);
    }

    #[test]
    fn events_compare_by_payload() {
        let a = InputEvent::KeyDown { key: KeyCode::Space, timestamp: 1 };
        let b = InputEvent::KeyDown { key: KeyCode::Space, timestamp: 2 };
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    //=====================================================================
    // Modifiers Tests
    //=====================================================================

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }

    #[test]
    fn modifier_constants() {
        assert!(Modifiers::SHIFT_CTRL.shift && Modifiers::SHIFT_CTRL.ctrl);
        assert!(!Modifiers::SHIFT_CTRL.alt);
        assert!(Modifiers::ALL.shift && Modifiers::ALL.ctrl && Modifiers::ALL.alt);
        assert_ne!(Modifiers::CTRL, Modifiers::SHIFT_CTRL);
    }
}
