//=========================================================================
// Reserved Shortcuts
//
// Editing chords the core intercepts before they reach the key table:
//
// ```text
//   Ctrl+A        → SelectAll
//   Ctrl+C        → Copy
//   Ctrl+X        → Cut
//   Ctrl+Shift+Z  → Redo      (checked before Undo)
//   Ctrl+Z        → Undo
//   Ctrl+V        → Paste
// ```
//
// Ctrl is mandatory; Shift only matters for Z. Alt is ignored.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::events::CoreEvent;
use super::input::{KeyCode, Modifiers};

//=== Shortcut ============================================================

/// UI intent produced by a reserved chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    SelectAll,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
}

impl From<Shortcut> for CoreEvent {
    fn from(shortcut: Shortcut) -> Self {
        match shortcut {
            Shortcut::SelectAll => CoreEvent::SelectAll,
            Shortcut::Copy => CoreEvent::Copy,
            Shortcut::Cut => CoreEvent::Cut,
            Shortcut::Paste => CoreEvent::Paste,
            Shortcut::Undo => CoreEvent::Undo,
            Shortcut::Redo => CoreEvent::Redo,
        }
    }
}

//=== reserved_shortcut() =================================================

/// Returns the intent bound to `key` under `modifiers`, if any.
pub fn reserved_shortcut(key: KeyCode, modifiers: Modifiers) -> Option<Shortcut> {
    if !modifiers.ctrl {
        return None;
    }

    match key {
        KeyCode::KeyA => Some(Shortcut::SelectAll),
        KeyCode::KeyC => Some(Shortcut::Copy),
        KeyCode::KeyX => Some(Shortcut::Cut),
        KeyCode::KeyZ if modifiers.shift => Some(Shortcut::Redo),
        KeyCode::KeyZ => Some(Shortcut::Undo),
        KeyCode::KeyV => Some(Shortcut::Paste),
        _ => None,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
