//=========================================================================
// Platform Subsystem
//
// The seam between the core and the native windowing/OpenGL/joystick
// libraries.
//
// Architecture:
// ```text
//  ┌──────────────────────────────┐
//  │ Core (event loop, video mode)│
//  └──────────────┬───────────────┘
//                 │ NativeBackend
//      ┌──────────┴───────────┐
//      ▼                      ▼
//  WinitBackend           HeadlessBackend
//   ├─ winit (pump)        └─ scripted queue,
//   ├─ glutin (GL ctx)        fake handles
//   └─ gilrs (joysticks)
// ```
//
// Key Design Decisions:
// - **Polling, not callbacks**: `poll_events` drains the entire native
//   queue into a vector once per tick; the core stays in charge of the
//   loop
// - **Opaque handles**: window and context identities are plain ids so
//   the core can reason about recreation without touching native types
// - **Capabilities are queried**: unsupported features return
//   `PlatformError::Unsupported` at runtime instead of being compiled out
//
//=========================================================================

//=== Submodules ==========================================================

mod headless;
mod input_processor;
mod winit_backend;

//=== External Crates =====================================================

use bitflags::bitflags;
use std::sync::Arc;

//=== Internal Imports ====================================================

use crate::core::input::KeyCode;
use crate::error::PlatformError;

//=== Public Exports ======================================================

pub use headless::HeadlessBackend;
pub use winit_backend::WinitBackend;

//=== NativeEvent =========================================================

/// Native mouse button as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeMouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// One entry of the native event queue.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// The user or the OS asked the application to quit.
    Quit,

    /// The window's drawable area changed size.
    Resized { width: u32, height: u32 },

    FocusGained,
    FocusLost,

    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },

    MouseButtonDown { button: NativeMouseButton },
    MouseButtonUp { button: NativeMouseButton },

    /// Cursor moved to (`x`, `y`), `dx`/`dy` relative to the last report.
    MouseMotion { x: f32, y: f32, dx: f32, dy: f32 },

    /// Vertical scroll amount; only its sign reaches the engine.
    MouseWheel { delta_y: f32 },

    JoystickAdded { device: usize },
    JoystickRemoved { device: usize },

    /// Axis value in [-1, 1].
    JoystickAxis { device: usize, axis: u32, value: f32 },
    JoystickButtonDown { device: usize, button: u32 },
    JoystickButtonUp { device: usize, button: u32 },
}

//=== Handles =============================================================

/// Opaque identity of a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub(crate) u64);

/// Opaque identity of a native graphics context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(pub(crate) u64);

/// Handles produced by a successful window creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeHandles {
    pub window: WindowHandle,
    pub context: ContextHandle,
}

//=== Window Settings =====================================================

bitflags! {
    /// Window creation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const OPENGL     = 1 << 0;
        const FULLSCREEN = 1 << 1;
        const RESIZABLE  = 1 << 2;
        const HIGH_DPI   = 1 << 3;
    }
}

/// Framebuffer attributes requested from the GL driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub double_buffer: bool,
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    /// `None` disables multisampling.
    pub samples: Option<u8>,
}

impl PixelFormat {
    /// Double-buffered RGBA8 with a 24-bit depth buffer.
    pub fn with_aa_level(aa_level: u8) -> Self {
        Self {
            double_buffer: true,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 24,
            samples: (aa_level > 0).then_some(aa_level),
        }
    }
}

/// Everything a backend needs to create or reconfigure the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub flags: WindowFlags,
    pub pixel_format: PixelFormat,
    pub monitor_index: usize,
}

/// Buffer swap behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapMode {
    /// Present immediately.
    Immediate,
    /// Wait for vertical blank.
    VSync,
    /// Wait for vertical blank unless the frame is late.
    Adaptive,
}

//=== Display Info ========================================================

/// A display mode offered by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
}

/// Current monitor resolution and refresh rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub refresh_hz: u32,
}

/// Cursor shapes the core can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    Arrow,
    Text,
    Pointer,
    ResizeHorizontal,
    ResizeVertical,
    ResizeDiagonal,
}

//=== NativeBackend =======================================================

/// Native windowing, GL context and input source.
///
/// All methods are called from the thread that owns the core. Window
/// operations before `create_window` succeed return
/// `PlatformError::Native`.
pub trait NativeBackend {
    /// Appends every pending native event to `out`, draining the queue.
    fn poll_events(&mut self, out: &mut Vec<NativeEvent>);

    /// Creates the window and its GL context. Called once.
    fn create_window(&mut self, settings: &WindowSettings) -> Result<NativeHandles, PlatformError>;

    /// Applies size, fullscreen and resizability to the existing window.
    fn reconfigure_window(&mut self, settings: &WindowSettings) -> Result<(), PlatformError>;

    /// Resizes the existing window; no-op when it already has that size.
    /// `centered` re-centers it on its monitor afterwards.
    fn resize_window(&mut self, width: u32, height: u32, centered: bool) -> Result<(), PlatformError>;

    fn set_swap_mode(&mut self, mode: SwapMode) -> Result<(), PlatformError>;

    fn swap_buffers(&mut self) -> Result<(), PlatformError>;

    /// Current drawable size in physical pixels, once a window exists.
    fn drawable_size(&self) -> Option<(u32, u32)>;

    /// GL function table of the current context, if any.
    fn gl_context(&self) -> Option<Arc<glow::Context>>;

    fn set_title(&mut self, title: &str);

    /// Display modes of monitor `monitor_index`, in native order.
    fn video_modes(&self, monitor_index: usize) -> Vec<VideoMode>;

    fn screen_info(&self, monitor_index: usize) -> Option<ScreenInfo>;

    /// Indices of joysticks connected at startup.
    fn joysticks(&self) -> Vec<usize>;

    /// `false` switches to relative mouse mode (hidden, locked cursor).
    fn set_mouse_enabled(&mut self, enabled: bool) -> Result<(), PlatformError>;

    /// Confines the cursor to the window.
    fn capture_mouse(&mut self, captured: bool) -> Result<(), PlatformError>;

    fn warp_cursor(&mut self, x: i32, y: i32) -> Result<(), PlatformError>;

    fn set_cursor(&mut self, cursor: CursorKind) -> Result<(), PlatformError>;

    /// Destroys the context, then the window, then releases the native
    /// subsystem. Later calls are no-ops.
    fn teardown(&mut self);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_format_is_fixed_rgba8_depth24() {
        let format = PixelFormat::with_aa_level(0);
        assert!(format.double_buffer);
        assert_eq!(
            (format.red_bits, format.green_bits, format.blue_bits, format.alpha_bits),
            (8, 8, 8, 8)
        );
        assert_eq!(format.depth_bits, 24);
        assert_eq!(format.samples, None);
    }

    #[test]
    fn pixel_format_requests_samples_for_aa() {
        assert_eq!(PixelFormat::with_aa_level(4).samples, Some(4));
    }

    #[test]
    fn window_flags_combine() {
        let flags = WindowFlags::OPENGL | WindowFlags::RESIZABLE;
        assert!(flags.contains(WindowFlags::OPENGL));
        assert!(!flags.contains(WindowFlags::FULLSCREEN));
    }

    #[test]
    fn native_event_is_debug() {
        let debug_str = format!("{:?}", NativeEvent::Resized { width: 1, height: 2 });
        assert!(debug_str.contains("Resized"));
    }
}
