//=========================================================================
// Frame Clock
//
// Frame pacing and tick bookkeeping for the system update.
//
// Each tick:
//  1. `sleep_for_frame()` sleeps off whatever is left of the frame budget
//  2. `advance()` measures the elapsed time since the previous tick
//
// A frame rate of 0 disables pacing.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::thread;
use std::time::{Duration, Instant};

//=== FrameClock ==========================================================

#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    frame_duration: Option<Duration>,
    elapsed: Duration,
    frame_count: u64,
}

impl FrameClock {
    /// Creates a clock targeting `frame_rate` ticks per second.
    pub fn new(frame_rate: u32) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_duration: (frame_rate > 0)
                .then(|| Duration::from_secs_f64(1.0 / f64::from(frame_rate))),
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Sleeps until a full frame has passed since the last tick.
    pub fn sleep_for_frame(&self) {
        if let Some(frame_duration) = self.frame_duration {
            let spent = self.last_tick.elapsed();
            if spent < frame_duration {
                thread::sleep(frame_duration - spent);
            }
        }
    }

    /// Starts a new tick.
    pub fn advance(&mut self) {
        let now = Instant::now();
        self.elapsed = now - self.last_tick;
        self.last_tick = now;
        self.frame_count += 1;
    }

    /// Milliseconds since the clock was created. Wraps after ~49 days.
    pub fn ticks(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Duration of the previous tick, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
