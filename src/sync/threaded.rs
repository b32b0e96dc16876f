//=========================================================================
// Threaded Work
//
// `Runnable` units run on detached native threads until their stop flag
// is cleared.
//
// Stopping is cooperative and best effort: `stop()` only clears the
// flag, and the worker exits after the `step()` in progress returns and
// the loop observes the cleared flag. No join handle is kept.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

//=== External Crates =====================================================

use log::{debug, info};

//=== Internal Imports ====================================================

use crate::error::PlatformError;

//=== StopFlag ============================================================

/// Shared running flag. Starts out running.
#[derive(Debug, Clone)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

//=== Runnable ============================================================

/// A repeatable unit of work with a cooperative stop flag.
pub trait Runnable: Send + 'static {
    /// One iteration of work.
    fn step(&mut self);

    fn stop_flag(&self) -> &StopFlag;

    fn stop(&self) {
        self.stop_flag().stop();
    }

    fn is_running(&self) -> bool {
        self.stop_flag().is_running()
    }

    /// Calls `step` until the flag is cleared.
    fn run(&mut self) {
        while self.is_running() {
            self.step();
        }
    }
}

//=== spawn ===============================================================

/// Runs `runnable` on a new detached thread and returns its stop flag.
pub fn spawn<R: Runnable>(mut runnable: R) -> Result<StopFlag, PlatformError> {
    let flag = runnable.stop_flag().clone();

    thread::Builder::new()
        .name("core-worker".into())
        .spawn(move || {
            debug!(target: "sync", "Worker started");
            runnable.run();
            debug!(target: "sync", "Worker finished");
        })?;

    info!(target: "sync", "Spawned worker thread");
    Ok(flag)
}

//=========================================================================
// Unit Tests
//=========================================================================
