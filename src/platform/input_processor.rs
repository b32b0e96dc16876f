//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit window events into backend-neutral `NativeEvent`s.
//
// Architecture:
//   WindowEvent → InputProcessor → NativeEvent → Core::system_update
//
// Stateful cursor tracking: winit reports absolute cursor positions only,
// so the processor remembers the last one to derive relative motion.
// Unmapped keys are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use super::{NativeEvent, NativeMouseButton};
use crate::core::input::KeyCode;

//=== InputProcessor ======================================================

/// Converts winit events to native events with cursor delta tracking.
pub(crate) struct InputProcessor {
    last_cursor: Option<(f32, f32)>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self { last_cursor: None }
    }

    //--- Event Processing -------------------------------------------------

    /// Translates one window event. Events the core does not consume map
    /// to `None`.
    pub(crate) fn process_window_event(&mut self, event: &WindowEvent) -> Option<NativeEvent> {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(NativeEvent::Quit),

            WindowEvent::Resized(size) => Some(NativeEvent::Resized {
                width: size.width,
                height: size.height,
            }),

            WindowEvent::Focused(true) => Some(NativeEvent::FocusGained),
            WindowEvent::Focused(false) => Some(NativeEvent::FocusLost),

            WindowEvent::KeyboardInput { event, .. } => self.process_key_event(event),

            WindowEvent::MouseInput { state, button, .. } => {
                let button = NativeMouseButton::from(*button);
                Some(match state {
                    ElementState::Pressed => NativeEvent::MouseButtonDown { button },
                    ElementState::Released => NativeEvent::MouseButtonUp { button },
                })
            }

            WindowEvent::CursorMoved { position, .. } => {
                Some(self.process_mouse_move(position.x as f32, position.y as f32))
            }

            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                None
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                Some(NativeEvent::MouseWheel { delta_y })
            }

            _ => None,
        }
    }

    /// Converts a winit key event (filters unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<NativeEvent> {
        let key = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key, KeyCode::Unidentified) {
            return None;
        }

        Some(match key_event.state {
            ElementState::Pressed => NativeEvent::KeyDown { key },
            ElementState::Released => NativeEvent::KeyUp { key },
        })
    }

    /// Creates a motion event; the first report after entering the window
    /// has zero delta.
    pub(crate) fn process_mouse_move(&mut self, x: f32, y: f32) -> NativeEvent {
        let (dx, dy) = match self.last_cursor {
            Some((lx, ly)) => (x - lx, y - ly),
            None => (0.0, 0.0),
        };
        self.last_cursor = Some((x, y));
        NativeEvent::MouseMotion { x, y, dx, dy }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

impl From<WinitMouseButton> for NativeMouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => Self::Left,
            WinitMouseButton::Right => Self::Right,
            WinitMouseButton::Middle => Self::Middle,
            WinitMouseButton::Back => Self::Back,
            WinitMouseButton::Forward => Self::Forward,
            WinitMouseButton::Other(code) => Self::Other(code),
        }
    }
}

/// Converts winit physical key codes to engine key codes.
///
/// Unmapped keys (F13-F24, numpad, media keys) return
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Function -----------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Modifiers ----------------------------------------------------

            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,
            SuperLeft => KeyCode::SuperLeft,
            SuperRight => KeyCode::SuperRight,

            //--- Navigation & Editing -----------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            Insert => KeyCode::Insert,
            Home => KeyCode::Home,
            End => KeyCode::End,
            PageUp => KeyCode::PageUp,
            PageDown => KeyCode::PageDown,
            CapsLock => KeyCode::CapsLock,

            //--- Punctuation --------------------------------------------------

            Minus => KeyCode::Minus,
            Equal => KeyCode::Equal,
            BracketLeft => KeyCode::BracketLeft,
            BracketRight => KeyCode::BracketRight,
            Backslash => KeyCode::Backslash,
            Semicolon => KeyCode::Semicolon,
            Quote => KeyCode::Quote,
            Comma => KeyCode::Comma,
            Period => KeyCode::Period,
            Slash => KeyCode::Slash,
            Backquote => KeyCode::Backquote,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    //=====================================================================
    // Key Mapping Tests
    //=====================================================================

    #[test]
    fn letters_and_modifiers_map() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::KeyZ);
        assert_eq!(KeyCode::from(WinitKeyCode::ControlRight), KeyCode::ControlRight);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftLeft), KeyCode::ShiftLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::F12), KeyCode::F12);
    }

    #[test]
    fn unmapped_keys_are_unidentified() {
        assert_eq!(KeyCode::from(WinitKeyCode::F24), KeyCode::Unidentified);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadAdd), KeyCode::Unidentified);
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn mouse_buttons_keep_native_identity() {
        assert_eq!(NativeMouseButton::from(WinitMouseButton::Middle), NativeMouseButton::Middle);
        assert_eq!(NativeMouseButton::from(WinitMouseButton::Back), NativeMouseButton::Back);
        assert_eq!(NativeMouseButton::from(WinitMouseButton::Other(9)), NativeMouseButton::Other(9));
    }

    #[test]
    fn mouse_move_tracks_delta() {
        let mut processor = InputProcessor::new();

        assert_eq!(
            processor.process_mouse_move(10.0, 10.0),
            NativeEvent::MouseMotion { x: 10.0, y: 10.0, dx: 0.0, dy: 0.0 }
        );
        assert_eq!(
            processor.process_mouse_move(15.0, 7.0),
            NativeEvent::MouseMotion { x: 15.0, y: 7.0, dx: 5.0, dy: -3.0 }
        );
    }

    //=====================================================================
    // Window Event Tests
    //=====================================================================

    #[test]
    fn window_events_translate() {
        let mut processor = InputProcessor::new();

        assert_eq!(
            processor.process_window_event(&WindowEvent::CloseRequested),
            Some(NativeEvent::Quit)
        );
        assert_eq!(
            processor.process_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(NativeEvent::Resized { width: 800, height: 600 })
        );
        assert_eq!(
            processor.process_window_event(&WindowEvent::Focused(false)),
            Some(NativeEvent::FocusLost)
        );
        assert_eq!(processor.process_window_event(&WindowEvent::Occluded(true)), None);
    }
}
