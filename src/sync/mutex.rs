//=========================================================================
// Core Mutex
//
// Opaque handle around exactly one native lock. The lock is held by a
// guard; releasing the guard (explicitly or by drop) unlocks it, so a
// thread can never unlock a lock it does not hold.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Arc;

//=== External Crates =====================================================

use log::trace;
use parking_lot::{Mutex, MutexGuard};

//=== CoreMutex ===========================================================

pub type CoreMutexGuard<'a> = MutexGuard<'a, ()>;

#[derive(Debug, Default)]
pub struct CoreMutex {
    lock: Mutex<()>,
}

impl CoreMutex {
    pub fn new() -> Self {
        Self { lock: Mutex::new(()) }
    }

    /// Blocks until the lock is acquired.
    pub fn lock(&self) -> CoreMutexGuard<'_> {
        self.lock.lock()
    }

    pub fn try_lock(&self) -> Option<CoreMutexGuard<'_>> {
        self.lock.try_lock()
    }

    /// Releases a lock taken with [`CoreMutex::lock`].
    pub fn unlock(guard: CoreMutexGuard<'_>) {
        drop(guard);
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

/// Allocates a new, unlocked mutex.
pub fn create_mutex() -> Arc<CoreMutex> {
    trace!(target: "sync", "Mutex created");
    Arc::new(CoreMutex::new())
}

//=========================================================================
// Unit Tests
//=========================================================================
