//=========================================================================
// Sync Shims
//
// Thread and mutex primitives handed out by the core.
//
// ```text
//   Core::create_thread(R: Runnable) ──spawn──> detached "core-worker"
//        │                                        loop { step() }
//        └─ StopFlag (clone) ──stop()──────────►  until !is_running()
//
//   Core::create_mutex() ──> Arc<CoreMutex> ──lock()──> CoreMutexGuard
// ```
//
//=========================================================================

pub mod mutex;
pub mod threaded;

pub use mutex::{create_mutex, CoreMutex, CoreMutexGuard};
pub use threaded::{spawn, Runnable, StopFlag};
