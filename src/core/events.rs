//=========================================================================
// Core Events
//
// Named notifications the core emits to engine listeners.
//
// Architecture:
// ```text
//   Core ──dispatch(CoreEvent)──> EventDispatcher
//                                    ├─► Sender ──► listener A (Receiver)
//                                    └─► Sender ──► listener B (Receiver)
// ```
//
// Delivery is fire-and-forget: listeners own their receivers and poll
// them at their own pace. Listeners that dropped their receiver are
// pruned on the next dispatch.
//
//=========================================================================

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;

//=== CoreEvent ===========================================================

/// Payload-free notification dispatched by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreEvent {
    /// The window/render size changed.
    Resized,

    /// Ctrl+A.
    SelectAll,

    /// Ctrl+C.
    Copy,

    /// Ctrl+X.
    Cut,

    /// Ctrl+V.
    Paste,

    /// Ctrl+Z.
    Undo,

    /// Ctrl+Shift+Z.
    Redo,

    /// The window gained keyboard focus.
    FocusGained,

    /// The window lost keyboard focus.
    FocusLost,
}

//=== EventDispatcher =====================================================

/// Fan-out of [`CoreEvent`]s to any number of channel listeners.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    listeners: Vec<Sender<CoreEvent>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener and returns its receiving end.
    pub fn subscribe(&mut self) -> Receiver<CoreEvent> {
        let (tx, rx) = unbounded();
        self.listeners.push(tx);
        rx
    }

    /// Sends `event` to every live listener.
    pub fn dispatch(&mut self, event: CoreEvent) {
        trace!(target: "core", "Dispatching {:?} to {} listeners", event, self.listeners.len());
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }

    /// Number of live listeners as of the last dispatch.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
