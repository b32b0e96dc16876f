//=========================================================================
// Winit Backend
//
// Native backend built on winit (window + events), glutin (OpenGL
// context) and gilrs (joysticks).
//
// Architecture:
// ```text
//  WinitBackend
//   ├─ EventLoop ──pump_app_events(0)──> EventCollector
//   │                                     ├─ InputProcessor
//   │                                     └─ queue: Vec<NativeEvent>
//   ├─ GlWindow (created once)
//   │   ├─ PossiblyCurrentContext
//   │   ├─ Surface<WindowSurface>
//   │   └─ Window
//   └─ Gilrs (optional, `gilrs` feature)
// ```
//
// Key Design Decisions:
// - **Pump, don't run**: the core owns the loop, so the event loop is
//   pumped with a zero timeout once per tick instead of `run_app()`
// - **Single instance**: winit allows one event loop per process; a
//   process-wide flag refuses a second backend until the first one is
//   torn down
// - **Main thread**: like every winit event loop, the backend must be
//   created and used on the main thread on macOS
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

//=== External Crates =====================================================

use glutin::config::{ColorBufferType, Config, ConfigTemplateBuilder};
use glutin::context::{ContextAttributesBuilder, PossiblyCurrentContext};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use log::*;
use raw_window_handle::HasWindowHandle;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize, Size},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    monitor::MonitorHandle,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{CursorGrabMode, CursorIcon, Fullscreen, Window, WindowId},
};

//=== Internal Imports ====================================================

use super::input_processor::InputProcessor;
use super::{
    ContextHandle, CursorKind, NativeBackend, NativeEvent, NativeHandles, ScreenInfo, SwapMode,
    VideoMode, WindowFlags, WindowHandle, WindowSettings,
};
use crate::error::PlatformError;

//=== Singleton Guard =====================================================

static NATIVE_ACTIVE: AtomicBool = AtomicBool::new(false);

//=== EventCollector ======================================================

/// Receives winit callbacks during a pump and queues native events.
struct EventCollector {
    processor: InputProcessor,
    queue: Vec<NativeEvent>,
    monitors: Vec<MonitorHandle>,
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.monitors = event_loop.available_monitors().collect();
        debug!(target: "platform", "{} monitor(s) available", self.monitors.len());
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match self.processor.process_window_event(&event) {
            Some(native) => self.queue.push(native),
            None => trace!(target: "platform::input", "Ignored window event"),
        }
    }
}

//=== GlWindow ============================================================

/// Window with its GL context. Fields drop in declaration order:
/// context, surface, window.
struct GlWindow {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    window: Window,
    gl: Arc<glow::Context>,
    handles: NativeHandles,
}

impl GlWindow {
    fn resize_surface(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
    }

    fn center_on_monitor(&self) {
        if let Some(monitor) = self.window.current_monitor() {
            let area = monitor.size();
            let origin = monitor.position();
            let outer = self.window.outer_size();
            let x = origin.x + (area.width as i32 - outer.width as i32) / 2;
            let y = origin.y + (area.height as i32 - outer.height as i32) / 2;
            self.window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    /// Requests `size` and resizes the surface if the window applied it
    /// immediately; otherwise the follow-up `Resized` event does it.
    fn request_size(&self, size: Size) {
        if let Some(applied) = self.window.request_inner_size(size) {
            self.resize_surface(applied.width, applied.height);
        }
    }
}

//=== WinitBackend ========================================================

pub struct WinitBackend {
    event_loop: EventLoop<()>,
    collector: EventCollector,
    window: Option<GlWindow>,
    #[cfg(feature = "gilrs")]
    gamepads: Option<gilrs::Gilrs>,
    next_id: u64,
    released: bool,
}

impl WinitBackend {
    //--- Construction -----------------------------------------------------

    /// Creates the event loop and the joystick subsystem.
    ///
    /// # Errors
    ///
    /// [`PlatformError::AlreadyInitialized`] while another backend is
    /// alive, [`PlatformError::EventLoop`] if winit cannot start.
    pub fn new() -> Result<Self, PlatformError> {
        if NATIVE_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PlatformError::AlreadyInitialized);
        }

        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                NATIVE_ACTIVE.store(false, Ordering::Release);
                return Err(e.into());
            }
        };

        let mut backend = Self {
            event_loop,
            collector: EventCollector {
                processor: InputProcessor::new(),
                queue: Vec::new(),
                monitors: Vec::new(),
            },
            window: None,
            #[cfg(feature = "gilrs")]
            gamepads: open_gamepads(),
            next_id: 1,
            released: false,
        };

        // Runs the startup callbacks so monitors are known before the
        // first window is created.
        backend.pump();
        info!(target: "platform", "Winit backend initialized");
        Ok(backend)
    }

    //--- Internal Helpers -------------------------------------------------

    fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.collector);

        if let PumpStatus::Exit(code) = status {
            info!(target: "platform", "Event loop exited with code {}", code);
            self.collector.queue.push(NativeEvent::Quit);
        }
    }

    fn gl_window(&self) -> Result<&GlWindow, PlatformError> {
        self.window
            .as_ref()
            .ok_or_else(|| PlatformError::Native("no window has been created".into()))
    }

    fn monitor(&self, index: usize) -> Option<MonitorHandle> {
        match &self.window {
            Some(gl_window) => gl_window.window.available_monitors().nth(index),
            None => self.collector.monitors.get(index).cloned(),
        }
    }

    fn fullscreen_for(&self, settings: &WindowSettings) -> Option<Fullscreen> {
        settings
            .flags
            .contains(WindowFlags::FULLSCREEN)
            .then(|| Fullscreen::Borderless(self.monitor(settings.monitor_index)))
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[cfg(feature = "gilrs")]
    fn poll_gamepads(&mut self, out: &mut Vec<NativeEvent>) {
        use gilrs::EventType;

        let Some(gamepads) = self.gamepads.as_mut() else {
            return;
        };

        while let Some(gilrs::Event { id, event, .. }) = gamepads.next_event() {
            let device = usize::from(id);
            let native = match event {
                EventType::Connected => NativeEvent::JoystickAdded { device },
                EventType::Disconnected => NativeEvent::JoystickRemoved { device },
                EventType::AxisChanged(_, value, code) => NativeEvent::JoystickAxis {
                    device,
                    axis: code.into_u32(),
                    value,
                },
                EventType::ButtonPressed(_, code) => NativeEvent::JoystickButtonDown {
                    device,
                    button: code.into_u32(),
                },
                EventType::ButtonReleased(_, code) => NativeEvent::JoystickButtonUp {
                    device,
                    button: code.into_u32(),
                },
                _ => continue,
            };
            out.push(native);
        }
    }
}

//=== Free Helpers ========================================================

/// Window size in the unit matching the HiDPI flag.
fn requested_size(settings: &WindowSettings) -> Size {
    if settings.flags.contains(WindowFlags::HIGH_DPI) {
        LogicalSize::new(settings.width, settings.height).into()
    } else {
        PhysicalSize::new(settings.width, settings.height).into()
    }
}

/// Orders sample counts: closest to `wanted` without exceeding it first,
/// then the smallest one above it. Lower ranks win.
fn sample_rank(samples: u8, wanted: u8) -> (u8, u8) {
    if samples <= wanted {
        (0, wanted - samples)
    } else {
        (1, samples - wanted)
    }
}

/// Picks the best-ranked config.
///
/// # Panics
///
/// Panics on an empty list. glutin returns an error instead of calling
/// the picker when nothing matches the template, so this never happens
/// in practice.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>, wanted: u8) -> Config {
    configs
        .min_by_key(|config| sample_rank(config.num_samples(), wanted))
        .unwrap_or_else(|| {
            error!(target: "platform::window", "GL config picker received no candidates");
            panic!("GL config picker received no candidates")
        })
}

#[cfg(feature = "gilrs")]
fn open_gamepads() -> Option<gilrs::Gilrs> {
    match gilrs::Gilrs::new() {
        Ok(gamepads) => Some(gamepads),
        Err(gilrs::Error::NotImplemented(gamepads)) => {
            warn!(target: "platform::input", "Joysticks not supported on this platform");
            Some(gamepads)
        }
        Err(e) => {
            warn!(target: "platform::input", "Joystick subsystem unavailable: {}", e);
            None
        }
    }
}

//=== NativeBackend =======================================================

impl NativeBackend for WinitBackend {
    fn poll_events(&mut self, out: &mut Vec<NativeEvent>) {
        self.pump();
        out.append(&mut self.collector.queue);

        #[cfg(feature = "gilrs")]
        self.poll_gamepads(out);
    }

    fn create_window(&mut self, settings: &WindowSettings) -> Result<NativeHandles, PlatformError> {
        if self.window.is_some() {
            return Err(PlatformError::Native("window already exists".into()));
        }

        let attributes = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(requested_size(settings))
            .with_resizable(settings.flags.contains(WindowFlags::RESIZABLE))
            .with_fullscreen(self.fullscreen_for(settings));

        //--- Pixel format -------------------------------------------------
        let format = settings.pixel_format;
        let mut template = ConfigTemplateBuilder::new()
            .with_buffer_type(ColorBufferType::Rgb {
                r_size: format.red_bits,
                g_size: format.green_bits,
                b_size: format.blue_bits,
            })
            .with_alpha_size(format.alpha_bits)
            .with_depth_size(format.depth_bits)
            .with_single_buffering(!format.double_buffer);
        if let Some(samples) = format.samples {
            template = template.with_multisampling(samples);
        }
        let wanted_samples = format.samples.unwrap_or(0);

        //--- Window + config ----------------------------------------------
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(&self.event_loop, template, |configs| pick_config(configs, wanted_samples))
            .map_err(|e| PlatformError::native("display setup", e))?;
        let window = window.ok_or_else(|| PlatformError::Native("no window was created".into()))?;
        debug!(target: "platform::window", "Selected GL config with {} samples", config.num_samples());

        //--- Context + surface --------------------------------------------
        let raw_handle = window
            .window_handle()
            .map_err(|e| PlatformError::native("window handle", e))?
            .as_raw();
        let display = config.display();

        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_handle));
        // SAFETY: `raw_handle` belongs to `window`, which outlives the
        // context (see `GlWindow` field order).
        let not_current = unsafe { display.create_context(&config, &context_attributes) }
            .map_err(|e| PlatformError::native("context creation", e))?;

        let size = window.inner_size();
        let (width, height) = match (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(PlatformError::Native(format!("window has zero size {:?}", size))),
        };
        let surface_attributes =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_handle, width, height);
        // SAFETY: as above.
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .map_err(|e| PlatformError::native("surface creation", e))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| PlatformError::native("make current", e))?;

        // SAFETY: the context was just made current on this thread.
        let gl = Arc::new(unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        });

        let handles = NativeHandles {
            window: WindowHandle(self.next_id()),
            context: ContextHandle(self.next_id()),
        };

        info!(
            target: "platform::window",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        let gl_window = GlWindow { context, surface, window, gl, handles };
        if !settings.flags.contains(WindowFlags::FULLSCREEN) {
            gl_window.center_on_monitor();
        }
        self.window = Some(gl_window);
        Ok(handles)
    }

    fn reconfigure_window(&mut self, settings: &WindowSettings) -> Result<(), PlatformError> {
        let fullscreen = self.fullscreen_for(settings);
        let gl_window = self.gl_window()?;

        gl_window.window.set_fullscreen(fullscreen);
        gl_window
            .window
            .set_resizable(settings.flags.contains(WindowFlags::RESIZABLE));
        gl_window.request_size(requested_size(settings));

        debug!(target: "platform::window", "Window reconfigured to {}x{}", settings.width, settings.height);
        Ok(())
    }

    fn resize_window(&mut self, width: u32, height: u32, centered: bool) -> Result<(), PlatformError> {
        let gl_window = self.gl_window()?;

        let current = gl_window.window.inner_size();
        if (current.width, current.height) != (width, height) {
            gl_window.request_size(PhysicalSize::new(width, height).into());
        } else {
            gl_window.resize_surface(width, height);
        }

        if centered {
            gl_window.center_on_monitor();
        }
        Ok(())
    }

    fn set_swap_mode(&mut self, mode: SwapMode) -> Result<(), PlatformError> {
        let gl_window = self.gl_window()?;
        let interval = match mode {
            SwapMode::Immediate => SwapInterval::DontWait,
            SwapMode::VSync => SwapInterval::Wait(NonZeroU32::MIN),
            SwapMode::Adaptive => return Err(PlatformError::Unsupported("adaptive vsync")),
        };

        gl_window
            .surface
            .set_swap_interval(&gl_window.context, interval)
            .map_err(|e| PlatformError::native("swap interval", e))
    }

    fn swap_buffers(&mut self) -> Result<(), PlatformError> {
        let gl_window = self.gl_window()?;
        gl_window
            .surface
            .swap_buffers(&gl_window.context)
            .map_err(|e| PlatformError::native("swap buffers", e))
    }

    fn drawable_size(&self) -> Option<(u32, u32)> {
        self.window.as_ref().map(|gl_window| {
            let size = gl_window.window.inner_size();
            (size.width, size.height)
        })
    }

    fn gl_context(&self) -> Option<Arc<glow::Context>> {
        self.window.as_ref().map(|w| Arc::clone(&w.gl))
    }

    fn set_title(&mut self, title: &str) {
        if let Some(gl_window) = &self.window {
            gl_window.window.set_title(title);
        }
    }

    fn video_modes(&self, monitor_index: usize) -> Vec<VideoMode> {
        self.monitor(monitor_index)
            .map(|monitor| {
                monitor
                    .video_modes()
                    .map(|mode| VideoMode {
                        width: mode.size().width,
                        height: mode.size().height,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn screen_info(&self, monitor_index: usize) -> Option<ScreenInfo> {
        self.monitor(monitor_index).map(|monitor| ScreenInfo {
            width: monitor.size().width,
            height: monitor.size().height,
            refresh_hz: monitor.refresh_rate_millihertz().unwrap_or(0) / 1000,
        })
    }

    fn joysticks(&self) -> Vec<usize> {
        #[cfg(feature = "gilrs")]
        if let Some(gamepads) = &self.gamepads {
            return gamepads.gamepads().map(|(id, _)| usize::from(id)).collect();
        }
        Vec::new()
    }

    fn set_mouse_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        let window = &self.gl_window()?.window;
        window.set_cursor_visible(enabled);

        let grab = if enabled {
            window.set_cursor_grab(CursorGrabMode::None)
        } else {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        };
        grab.map_err(|e| PlatformError::native("cursor grab", e))
    }

    fn capture_mouse(&mut self, captured: bool) -> Result<(), PlatformError> {
        let mode = if captured { CursorGrabMode::Confined } else { CursorGrabMode::None };
        self.gl_window()?
            .window
            .set_cursor_grab(mode)
            .map_err(|e| PlatformError::native("cursor grab", e))
    }

    fn warp_cursor(&mut self, x: i32, y: i32) -> Result<(), PlatformError> {
        self.gl_window()?
            .window
            .set_cursor_position(PhysicalPosition::new(x, y))
            .map_err(|e| PlatformError::native("cursor warp", e))
    }

    fn set_cursor(&mut self, cursor: CursorKind) -> Result<(), PlatformError> {
        let icon = match cursor {
            CursorKind::Arrow => CursorIcon::Default,
            CursorKind::Text => CursorIcon::Text,
            CursorKind::Pointer => CursorIcon::Pointer,
            CursorKind::ResizeHorizontal => CursorIcon::EwResize,
            CursorKind::ResizeVertical => CursorIcon::NsResize,
            CursorKind::ResizeDiagonal => CursorIcon::NwseResize,
        };
        self.gl_window()?.window.set_cursor(icon);
        Ok(())
    }

    fn teardown(&mut self) {
        if self.released {
            return;
        }

        if let Some(GlWindow { context, surface, window, gl, handles }) = self.window.take() {
            drop(gl);
            drop(context);
            drop(surface);
            drop(window);
            debug!(target: "platform::window", "Destroyed window {:?}", handles);
        }

        #[cfg(feature = "gilrs")]
        {
            self.gamepads = None;
        }

        self.released = true;
        NATIVE_ACTIVE.store(false, Ordering::Release);
        info!(target: "platform", "Winit backend torn down");
    }
}

impl Drop for WinitBackend {
    fn drop(&mut self) {
        self.teardown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
