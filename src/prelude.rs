//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_platform::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Core
pub use crate::core::{Core, CoreBuilder, CoreConfig, VideoSettings};
pub use crate::error::PlatformError;

// Events & input
pub use crate::core::events::CoreEvent;
pub use crate::core::input::{CoreInput, InputEvent, KeyCode, Modifiers, MouseButton, WheelDirection};

// Rendering collaborators
pub use crate::core::services::{CoreModule, Renderer};

// Backends
pub use crate::platform::{CursorKind, HeadlessBackend, NativeBackend, NativeEvent, WinitBackend};

// Threads & mutexes
pub use crate::sync::{CoreMutex, Runnable, StopFlag};
