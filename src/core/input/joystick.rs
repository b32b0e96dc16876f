//=========================================================================
// Joystick State
//
// Per-device axis and button table, keyed by the native axis/button
// index. Owned by `CoreInput`, one entry per connected device.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::{HashMap, HashSet};

//=== JoystickState =======================================================

/// Snapshot of one joystick's axes and buttons.
#[derive(Debug, Clone, Default)]
pub struct JoystickState {
    axes: HashMap<u32, f32>,
    buttons: HashSet<u32>,
}

impl JoystickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an axis value, clamped to [-1, 1].
    pub(super) fn set_axis(&mut self, axis: u32, value: f32) -> f32 {
        let value = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
        self.axes.insert(axis, value);
        value
    }

    /// Returns `true` if the pressed state changed.
    pub(super) fn set_button(&mut self, button: u32, pressed: bool) -> bool {
        if pressed {
            self.buttons.insert(button)
        } else {
            self.buttons.remove(&button)
        }
    }

    /// Last reported value of `axis`, 0.0 if never moved.
    pub fn axis(&self, axis: u32) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    pub fn is_button_pressed(&self, button: u32) -> bool {
        self.buttons.contains(&button)
    }

    /// Number of distinct axes reported so far.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
