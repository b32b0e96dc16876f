//=========================================================================
// Aetheric Platform — Library Root
//
// Platform abstraction layer of the Aetheric Engine.
//
// Responsibilities:
// - Expose the `Core` (window/context lifecycle, event loop, input)
// - Put the native windowing libraries behind the `NativeBackend` seam
// - Provide thread, mutex and OS shims (processes, disk, clipboard)
//
// Typical usage:
// ```no_run
// use aetheric_platform::{Core, CoreBuilder};
//
// fn main() -> Result<(), aetheric_platform::PlatformError> {
//     let mut core = Core::native(CoreBuilder::new().with_title("Demo").build())?;
//     while core.system_update() {
//         core.render()?;
//     }
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` owns the event loop and the engine-facing state (input, events,
// renderer services). `platform` holds the backend trait and its winit
// and headless implementations.
//
pub mod core;
pub mod error;
pub mod os;
pub mod platform;
pub mod prelude;
pub mod sync;

//--- Public Exports ------------------------------------------------------

pub use crate::core::{Core, CoreBuilder, CoreConfig};
pub use error::PlatformError;
