//=========================================================================
// Headless Backend
//
// Display-free `NativeBackend` with a scripted event queue.
//
// Used by tests, CI and tools that drive the core without a window
// server. Window and context handles are synthetic; every call is
// recorded so callers can assert on what the core asked for.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::VecDeque;
use std::sync::Arc;

//=== External Crates =====================================================

use log::debug;

//=== Internal Imports ====================================================

use super::{
    ContextHandle, CursorKind, NativeBackend, NativeEvent, NativeHandles, ScreenInfo, SwapMode,
    VideoMode, WindowFlags, WindowHandle, WindowSettings,
};
use crate::error::PlatformError;

//=== HeadlessWindow ======================================================

/// State of the synthetic window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub handles: NativeHandles,
    pub settings: WindowSettings,
    /// Physical size; differs from the settings under `HIGH_DPI`.
    pub drawable_size: (u32, u32),
    pub centered: bool,
    pub mouse_enabled: bool,
    pub mouse_captured: bool,
    pub cursor: CursorKind,
}

//=== HeadlessBackend =====================================================

#[derive(Debug)]
pub struct HeadlessBackend {
    queue: VecDeque<NativeEvent>,
    window: Option<HeadlessWindow>,
    next_id: u64,
    adaptive_vsync: bool,
    scale_factor: f64,
    video_modes: Vec<VideoMode>,
    joysticks: Vec<usize>,

    //--- Call Log ---------------------------------------------------------
    windows_created: usize,
    native_resizes: usize,
    swap_modes: Vec<SwapMode>,
    frames_presented: u64,
    torn_down: bool,
}

impl HeadlessBackend {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            window: None,
            next_id: 1,
            adaptive_vsync: false,
            scale_factor: 1.0,
            video_modes: vec![
                VideoMode { width: 1920, height: 1080 },
                VideoMode { width: 1280, height: 720 },
                VideoMode { width: 800, height: 600 },
            ],
            joysticks: Vec::new(),
            windows_created: 0,
            native_resizes: 0,
            swap_modes: Vec::new(),
            frames_presented: 0,
            torn_down: false,
        }
    }

    /// Reports adaptive vsync as supported.
    pub fn with_adaptive_vsync(mut self, supported: bool) -> Self {
        self.adaptive_vsync = supported;
        self
    }

    /// Display scale applied to `HIGH_DPI` window sizes.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_video_modes(mut self, modes: Vec<VideoMode>) -> Self {
        self.video_modes = modes;
        self
    }

    /// Joysticks reported as connected at startup.
    pub fn with_joysticks(mut self, devices: Vec<usize>) -> Self {
        self.joysticks = devices;
        self
    }

    //--- Scripting --------------------------------------------------------

    /// Queues an event for the next `poll_events`.
    pub fn push_event(&mut self, event: NativeEvent) {
        self.queue.push_back(event);
    }

    pub fn push_events(&mut self, events: impl IntoIterator<Item = NativeEvent>) {
        self.queue.extend(events);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    //--- Inspection -------------------------------------------------------

    pub fn window(&self) -> Option<&HeadlessWindow> {
        self.window.as_ref()
    }

    pub fn windows_created(&self) -> usize {
        self.windows_created
    }

    /// Resizes that actually changed the window size.
    pub fn native_resizes(&self) -> usize {
        self.native_resizes
    }

    /// Swap modes that were applied successfully, in order.
    pub fn swap_modes(&self) -> &[SwapMode] {
        &self.swap_modes
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    //--- Internal Helpers -------------------------------------------------

    fn window_mut(&mut self) -> Result<&mut HeadlessWindow, PlatformError> {
        self.window
            .as_mut()
            .ok_or_else(|| PlatformError::Native("no window has been created".into()))
    }

    fn physical_size(&self, settings: &WindowSettings) -> (u32, u32) {
        if settings.flags.contains(WindowFlags::HIGH_DPI) {
            let scale = |v: u32| (f64::from(v) * self.scale_factor).round() as u32;
            (scale(settings.width), scale(settings.height))
        } else {
            (settings.width, settings.height)
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

//=== NativeBackend =======================================================

impl NativeBackend for HeadlessBackend {
    fn poll_events(&mut self, out: &mut Vec<NativeEvent>) {
        out.extend(self.queue.drain(..));
    }

    fn create_window(&mut self, settings: &WindowSettings) -> Result<NativeHandles, PlatformError> {
        if self.window.is_some() {
            return Err(PlatformError::Native("window already exists".into()));
        }

        let handles = NativeHandles {
            window: WindowHandle(self.next_id()),
            context: ContextHandle(self.next_id()),
        };
        debug!(target: "platform", "Headless window {:?} created", handles);

        let drawable_size = self.physical_size(settings);
        self.window = Some(HeadlessWindow {
            handles,
            settings: settings.clone(),
            drawable_size,
            centered: true,
            mouse_enabled: true,
            mouse_captured: false,
            cursor: CursorKind::Arrow,
        });
        self.windows_created += 1;
        Ok(handles)
    }

    fn reconfigure_window(&mut self, settings: &WindowSettings) -> Result<(), PlatformError> {
        let drawable_size = self.physical_size(settings);
        let window = self.window_mut()?;
        let resized = window.drawable_size != drawable_size;
        window.settings = settings.clone();
        window.drawable_size = drawable_size;
        if resized {
            self.native_resizes += 1;
        }
        Ok(())
    }

    fn resize_window(&mut self, width: u32, height: u32, centered: bool) -> Result<(), PlatformError> {
        let window = self.window_mut()?;
        window.centered = centered;
        if window.drawable_size == (width, height) {
            return Ok(());
        }
        window.drawable_size = (width, height);
        self.native_resizes += 1;
        Ok(())
    }

    fn set_swap_mode(&mut self, mode: SwapMode) -> Result<(), PlatformError> {
        self.window_mut()?;
        if mode == SwapMode::Adaptive && !self.adaptive_vsync {
            return Err(PlatformError::Unsupported("adaptive vsync"));
        }
        self.swap_modes.push(mode);
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<(), PlatformError> {
        self.window_mut()?;
        self.frames_presented += 1;
        Ok(())
    }

    fn drawable_size(&self) -> Option<(u32, u32)> {
        self.window.as_ref().map(|w| w.drawable_size)
    }

    fn gl_context(&self) -> Option<Arc<glow::Context>> {
        None
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.window.as_mut() {
            window.settings.title = title.to_string();
        }
    }

    fn video_modes(&self, _monitor_index: usize) -> Vec<VideoMode> {
        self.video_modes.clone()
    }

    fn screen_info(&self, _monitor_index: usize) -> Option<ScreenInfo> {
        self.video_modes.first().map(|mode| ScreenInfo {
            width: mode.width,
            height: mode.height,
            refresh_hz: 60,
        })
    }

    fn joysticks(&self) -> Vec<usize> {
        self.joysticks.clone()
    }

    fn set_mouse_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        self.window_mut()?.mouse_enabled = enabled;
        Ok(())
    }

    fn capture_mouse(&mut self, captured: bool) -> Result<(), PlatformError> {
        self.window_mut()?.mouse_captured = captured;
        Ok(())
    }

    fn warp_cursor(&mut self, x: i32, y: i32) -> Result<(), PlatformError> {
        self.window_mut()?;
        self.queue.push_back(NativeEvent::MouseMotion {
            x: x as f32,
            y: y as f32,
            dx: 0.0,
            dy: 0.0,
        });
        Ok(())
    }

    fn set_cursor(&mut self, cursor: CursorKind) -> Result<(), PlatformError> {
        self.window_mut()?.cursor = cursor;
        Ok(())
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.window = None;
        self.queue.clear();
        self.torn_down = true;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
