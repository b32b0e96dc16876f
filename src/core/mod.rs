//=========================================================================
// Core
//
// Owner of the window, the event loop and the platform shims.
//
// Responsibilities:
// - Create the window + GL context once, then reconfigure it in place
// - Pump the native event queue once per tick and feed the input bridge
// - Intercept reserved editing shortcuts and notify listeners
// - Drive the renderer through the service locator
// - Hand out threads, mutexes and OS helpers
//
// Architecture:
// ```text
//   host loop:  while core.system_update() { core.render()?; }
//
//   system_update()
//     ├─ FrameClock::sleep_for_frame() / advance()
//     ├─ CoreInput::begin_tick()        (log holds one tick)
//     ├─ NativeBackend::poll_events()   (entire queue)
//     └─ handle_native_event() per event (under the event mutex)
//          ├─ Quit ──────────► running = false
//          ├─ Resized ───────► backend + renderer + CoreEvent::Resized
//          ├─ Focus ─────────► gain_focus() / lose_focus()
//          ├─ KeyDown ───────► reserved_shortcut()? ─► CoreEvent
//          │                                     else ─► CoreInput
//          └─ Key/Mouse/Joy ─► CoreInput
// ```
//
// Notes:
// The core is single-threaded and not `Send`: input and window state are
// only mutated by the thread that calls `system_update`. Workers spawned
// through `create_thread` share data via `create_mutex` handles.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod clock;
pub mod config;
pub mod events;
pub mod input;
pub mod renderer;
pub mod services;
pub mod shortcuts;

//=== Standard Library Imports ============================================

use std::path::Path;
use std::process::ExitStatus;
use std::sync::Arc;

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, info, trace, warn};

//=== Internal Imports ====================================================

use crate::error::PlatformError;
use crate::os::{self, Clipboard, CommandOutput, SystemPaths};
use crate::platform::{
    ContextHandle, CursorKind, NativeBackend, NativeEvent, NativeHandles, NativeMouseButton,
    PixelFormat, ScreenInfo, SwapMode, VideoMode, WindowFlags, WindowSettings, WinitBackend,
};
use crate::sync::{self, CoreMutex, Runnable, StopFlag};
use clock::FrameClock;
use events::{CoreEvent, EventDispatcher};
use input::{CoreInput, MouseButton};
use renderer::GlRenderer;
use services::{Renderer, Services};
use shortcuts::reserved_shortcut;

//=== Public Exports ======================================================

pub use config::{CoreBuilder, CoreConfig, VideoSettings};

//=== WindowState =========================================================

/// Tracked state of the window and its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub aa_level: u8,
    pub anisotropy: u8,
    pub resizable: bool,
    pub retina: bool,
    /// Re-center the window after native resizes.
    pub centered: bool,
    /// Set once by the first `set_video_mode`.
    pub handles: Option<NativeHandles>,
}

impl WindowState {
    fn new(config: &CoreConfig) -> Self {
        Self {
            width: config.video.width,
            height: config.video.height,
            fullscreen: config.video.fullscreen,
            vsync: config.video.vsync,
            aa_level: config.video.aa_level,
            anisotropy: config.video.anisotropy,
            resizable: config.resizable,
            retina: config.video.retina,
            centered: !config.resizable,
            handles: None,
        }
    }

    fn apply(&mut self, video: &VideoSettings) {
        self.width = video.width;
        self.height = video.height;
        self.fullscreen = video.fullscreen;
        self.vsync = video.vsync;
        self.aa_level = video.aa_level;
        self.anisotropy = video.anisotropy;
        self.retina = video.retina;
    }
}

//=== Core ================================================================

pub struct Core<B: NativeBackend> {
    //--- Platform ---------------------------------------------------------
    backend: B,
    config: CoreConfig,
    window: WindowState,
    native_events: Vec<NativeEvent>,

    //--- Engine-Facing State ----------------------------------------------
    input: CoreInput,
    services: Services,
    dispatcher: EventDispatcher,
    clock: FrameClock,

    //--- Lifecycle --------------------------------------------------------
    running: bool,
    has_focus: bool,
    paused: bool,
    shut_down: bool,

    //--- Shims ------------------------------------------------------------
    event_mutex: Arc<CoreMutex>,
    paths: SystemPaths,
    clipboard: Box<dyn Clipboard>,
}

impl Core<WinitBackend> {
    /// Initializes the core on the native winit backend.
    ///
    /// Must be called on the main thread.
    pub fn native(config: CoreConfig) -> Result<Self, PlatformError> {
        Self::new(WinitBackend::new()?, config)
    }
}

impl<B: NativeBackend> Core<B> {
    //=====================================================================
    // Construction
    //=====================================================================

    /// Initializes the core with the default OpenGL renderer.
    pub fn new(backend: B, config: CoreConfig) -> Result<Self, PlatformError> {
        let renderer = GlRenderer::new(config.video.aa_level, config.video.anisotropy);
        Self::with_renderer(backend, config, Box::new(renderer))
    }

    /// Initializes the core with a caller-provided renderer.
    pub fn with_renderer(
        backend: B,
        config: CoreConfig,
        renderer: Box<dyn Renderer>,
    ) -> Result<Self, PlatformError> {
        let paths = SystemPaths::resolve();
        let event_mutex = sync::create_mutex();

        let mut services = Services::new();
        services.set_renderer(renderer);

        let mut core = Self {
            backend,
            window: WindowState::new(&config),
            native_events: Vec::with_capacity(64),
            input: CoreInput::new(),
            services,
            dispatcher: EventDispatcher::new(),
            clock: FrameClock::new(config.frame_rate),
            running: true,
            has_focus: true,
            paused: false,
            shut_down: false,
            event_mutex,
            paths,
            clipboard: Box::new(os::UnsupportedClipboard),
            config,
        };

        core.set_video_mode(core.config.video.clone())?;
        let title = core.config.title.clone();
        core.backend.set_title(&title);

        for device in core.backend.joysticks() {
            core.input.add_joystick(device);
        }

        let gl = core.backend.gl_context();
        if let Some(renderer) = core.services.renderer_mut() {
            renderer.init(gl);
        }

        core.clipboard = os::system_clipboard();

        info!(target: "core", "Core initialized ({}x{})", core.window.width, core.window.height);
        Ok(core)
    }

    //=====================================================================
    // Video Mode
    //=====================================================================

    /// Creates the window on first use, otherwise reconfigures it in
    /// place. The GL context is never recreated.
    pub fn set_video_mode(&mut self, video: VideoSettings) -> Result<(), PlatformError> {
        let settings = self.window_settings(&video);

        match self.window.handles {
            None => {
                let handles = self.backend.create_window(&settings)?;
                info!(target: "core", "Window created with context {:?}", handles.context);
                self.window.handles = Some(handles);
            }
            Some(_) => self.backend.reconfigure_window(&settings)?,
        }

        // Tracked size and viewport are in physical pixels, the unit of
        // native resize events; a HiDPI request is made in logical units.
        let (width, height) = self
            .backend
            .drawable_size()
            .unwrap_or((video.width, video.height));
        self.window.apply(&video);
        self.window.width = width;
        self.window.height = height;
        self.apply_swap_mode(video.vsync);

        if let Some(renderer) = self.services.renderer_mut() {
            renderer.resize(width, height);
        }

        debug!(
            target: "core",
            "Video mode {}x{} ({}x{} px) fullscreen={} aa={}",
            video.width, video.height, width, height, video.fullscreen, video.aa_level
        );
        self.config.video = video;
        self.dispatcher.dispatch(CoreEvent::Resized);
        Ok(())
    }

    fn window_settings(&self, video: &VideoSettings) -> WindowSettings {
        let mut flags = WindowFlags::OPENGL;
        flags.set(WindowFlags::FULLSCREEN, video.fullscreen);
        flags.set(WindowFlags::RESIZABLE, self.config.resizable);
        flags.set(WindowFlags::HIGH_DPI, video.retina);

        WindowSettings {
            title: self.config.title.clone(),
            width: video.width,
            height: video.height,
            flags,
            pixel_format: PixelFormat::with_aa_level(video.aa_level),
            monitor_index: self.config.monitor_index,
        }
    }

    /// Adaptive sync first, plain vsync as fallback.
    fn apply_swap_mode(&mut self, vsync: bool) {
        let result = if vsync {
            self.backend.set_swap_mode(SwapMode::Adaptive).or_else(|e| {
                debug!(target: "core", "Falling back to vsync: {}", e);
                self.backend.set_swap_mode(SwapMode::VSync)
            })
        } else {
            self.backend.set_swap_mode(SwapMode::Immediate)
        };

        if let Err(e) = result {
            warn!(target: "core", "Could not set swap interval: {}", e);
        }
    }

    /// Display modes of the configured monitor, in native order.
    pub fn video_modes(&self) -> Vec<VideoMode> {
        self.backend.video_modes(self.config.monitor_index)
    }

    pub fn screen_info(&self) -> Option<ScreenInfo> {
        self.backend.screen_info(self.config.monitor_index)
    }

    /// Resizes the renderer only; the window keeps its size.
    pub fn resize_to(&mut self, width: u32, height: u32) {
        if let Some(renderer) = self.services.renderer_mut() {
            renderer.resize(width, height);
        }
    }

    pub fn set_window_title(&mut self, title: &str) {
        self.config.title = title.to_string();
        self.backend.set_title(title);
    }

    //=====================================================================
    // Event Loop
    //=====================================================================

    /// Runs one tick. Returns `false` once a quit was received.
    pub fn system_update(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.clock.sleep_for_frame();
        self.clock.advance();
        self.input.begin_tick();

        let mut events = std::mem::take(&mut self.native_events);
        self.backend.poll_events(&mut events);

        let mutex = Arc::clone(&self.event_mutex);
        let guard = mutex.lock();
        for event in events.drain(..) {
            self.handle_native_event(event);
        }
        CoreMutex::unlock(guard);

        self.native_events = events;
        self.running
    }

    fn handle_native_event(&mut self, event: NativeEvent) {
        let timestamp = self.clock.ticks();

        match event {
            NativeEvent::Quit => {
                info!(target: "core", "Quit requested");
                self.running = false;
            }

            NativeEvent::Resized { width, height } => self.handle_resize(width, height),

            NativeEvent::FocusGained => self.gain_focus(),
            NativeEvent::FocusLost => self.lose_focus(),

            //--- Keyboard -----------------------------------------------------
            NativeEvent::KeyDown { key } => {
                match reserved_shortcut(key, self.input.modifiers()) {
                    Some(shortcut) => {
                        debug!(target: "core", "Shortcut {:?}", shortcut);
                        self.dispatcher.dispatch(shortcut.into());
                    }
                    None => self.input.set_key_state(key, true, timestamp),
                }
            }
            NativeEvent::KeyUp { key } => self.input.set_key_state(key, false, timestamp),

            //--- Mouse --------------------------------------------------------
            NativeEvent::MouseButtonDown { button } | NativeEvent::MouseButtonUp { button } => {
                let pressed = matches!(event, NativeEvent::MouseButtonDown { .. });
                match logical_button(button) {
                    Some(button) => self.input.set_mouse_button_state(button, pressed, timestamp),
                    None => trace!(target: "core", "Ignored mouse button {:?}", button),
                }
            }
            NativeEvent::MouseMotion { x, y, dx, dy } => {
                self.input.set_delta_position(dx, dy);
                self.input.set_mouse_position(x, y, timestamp);
            }
            NativeEvent::MouseWheel { delta_y } => {
                if delta_y > 0.0 {
                    self.input.mouse_wheel_up(timestamp);
                } else if delta_y < 0.0 {
                    self.input.mouse_wheel_down(timestamp);
                }
            }

            //--- Joysticks ----------------------------------------------------
            NativeEvent::JoystickAdded { device } => self.input.add_joystick(device),
            NativeEvent::JoystickRemoved { device } => self.input.remove_joystick(device),
            NativeEvent::JoystickAxis { device, axis, value } => {
                self.input.joystick_axis_moved(axis, value, device)
            }
            NativeEvent::JoystickButtonDown { device, button } => {
                self.input.joystick_button_down(button, device)
            }
            NativeEvent::JoystickButtonUp { device, button } => {
                self.input.joystick_button_up(button, device)
            }
        }
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        self.window.width = width;
        self.window.height = height;
        self.window.centered = !self.window.resizable;

        if let Err(e) = self.backend.resize_window(width, height, self.window.centered) {
            warn!(target: "core", "Native resize to {}x{} failed: {}", width, height, e);
        }
        if let Some(renderer) = self.services.renderer_mut() {
            renderer.resize(width, height);
        }

        debug!(target: "core", "Resized to {}x{}", width, height);
        self.dispatcher.dispatch(CoreEvent::Resized);
    }

    fn gain_focus(&mut self) {
        self.has_focus = true;
        if self.paused {
            info!(target: "core", "Resuming");
            self.paused = false;
        }
        self.dispatcher.dispatch(CoreEvent::FocusGained);
    }

    fn lose_focus(&mut self) {
        self.has_focus = false;
        if self.config.pause_on_focus_loss {
            info!(target: "core", "Pausing while unfocused");
            self.paused = true;
        }
        self.dispatcher.dispatch(CoreEvent::FocusLost);
    }

    //=====================================================================
    // Rendering
    //=====================================================================

    /// Renders one frame and presents it. Skipped while paused.
    pub fn render(&mut self) -> Result<(), PlatformError> {
        if self.paused {
            return Ok(());
        }
        self.services.render();
        self.backend.swap_buffers()
    }

    //=====================================================================
    // Cursor
    //=====================================================================

    /// Disabling hides the cursor and switches to relative motion.
    pub fn enable_mouse(&mut self, enabled: bool) -> Result<(), PlatformError> {
        self.backend.set_mouse_enabled(enabled)
    }

    pub fn capture_mouse(&mut self, captured: bool) -> Result<(), PlatformError> {
        self.backend.capture_mouse(captured)
    }

    pub fn warp_cursor(&mut self, x: i32, y: i32) -> Result<(), PlatformError> {
        self.backend.warp_cursor(x, y)
    }

    pub fn set_cursor(&mut self, cursor: CursorKind) -> Result<(), PlatformError> {
        self.backend.set_cursor(cursor)
    }

    //=====================================================================
    // Threads & Mutexes
    //=====================================================================

    /// Runs `runnable` on a detached thread; the flag stops it.
    pub fn create_thread<R: Runnable>(&self, runnable: R) -> Result<StopFlag, PlatformError> {
        sync::spawn(runnable)
    }

    pub fn create_mutex(&self) -> Arc<CoreMutex> {
        sync::create_mutex()
    }

    /// Held by `system_update` while events are dispatched.
    pub fn event_mutex(&self) -> Arc<CoreMutex> {
        Arc::clone(&self.event_mutex)
    }

    //=====================================================================
    // OS Services
    //=====================================================================

    /// Opens `url` with the configured opener without waiting for it.
    pub fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        os::open_url_with(&self.config.url_opener, url)?.detach();
        Ok(())
    }

    pub fn execute_external_command(
        &self,
        command: &str,
        args: &str,
        dir: Option<&Path>,
    ) -> Result<CommandOutput, PlatformError> {
        os::execute_external_command(command, args, dir)
    }

    pub fn copy_disk_item(&self, src: &Path, dest: &Path) -> Result<ExitStatus, PlatformError> {
        os::copy_disk_item(src, dest)
    }

    pub fn move_disk_item(&self, src: &Path, dest: &Path) -> Result<ExitStatus, PlatformError> {
        os::move_disk_item(src, dest)
    }

    pub fn remove_disk_item(&self, path: &Path) -> Result<ExitStatus, PlatformError> {
        os::remove_disk_item(path)
    }

    pub fn create_folder(&self, path: &Path) -> Result<(), PlatformError> {
        os::create_folder(path)
    }

    pub fn clipboard_supported(&self) -> bool {
        self.clipboard.is_supported()
    }

    pub fn copy_string_to_clipboard(&mut self, text: &str) -> Result<(), PlatformError> {
        self.clipboard.set_string(text)
    }

    pub fn clipboard_string(&mut self) -> Result<String, PlatformError> {
        self.clipboard.get_string()
    }

    pub fn paths(&self) -> &SystemPaths {
        &self.paths
    }

    //=====================================================================
    // Accessors
    //=====================================================================

    /// New listener for [`CoreEvent`]s.
    pub fn subscribe(&mut self) -> Receiver<CoreEvent> {
        self.dispatcher.subscribe()
    }

    pub fn input(&self) -> &CoreInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut CoreInput {
        &mut self.input
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn window_state(&self) -> &WindowState {
        &self.window
    }

    pub fn context_handle(&self) -> Option<ContextHandle> {
        self.window.handles.map(|h| h.context)
    }

    pub fn width(&self) -> u32 {
        self.window.width
    }

    pub fn height(&self) -> u32 {
        self.window.height
    }

    /// Milliseconds since the core started.
    pub fn ticks(&self) -> u32 {
        self.clock.ticks()
    }

    /// Duration of the previous tick in seconds.
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    //=====================================================================
    // Teardown
    //=====================================================================

    /// Destroys the context and window and releases the native
    /// subsystem. Later calls are no-ops.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.running = false;
        self.backend.teardown();
        self.shut_down = true;
        info!(target: "core", "Core shut down after {} frames", self.clock.frame_count());
    }
}

impl<B: NativeBackend> Drop for Core<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=== Helpers =============================================================

fn logical_button(button: NativeMouseButton) -> Option<MouseButton> {
    match button {
        NativeMouseButton::Left => Some(MouseButton::Left),
        NativeMouseButton::Right => Some(MouseButton::Right),
        NativeMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode, WheelDirection};
    use crate::platform::HeadlessBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Fixtures ---------------------------------------------------------

    #[derive(Clone, Default)]
    struct SizeLog(Rc<RefCell<Vec<(u32, u32)>>>);

    impl Renderer for SizeLog {
        fn resize(&mut self, width: u32, height: u32) {
            self.0.borrow_mut().push((width, height));
        }
        fn begin_render(&mut self) {}
        fn end_render(&mut self) {}
    }

    fn config() -> CoreConfig {
        CoreBuilder::new().with_frame_rate(0).build()
    }

    fn core() -> Core<HeadlessBackend> {
        Core::new(HeadlessBackend::new(), config()).unwrap()
    }

    fn tick_with(core: &mut Core<HeadlessBackend>, events: Vec<NativeEvent>) -> bool {
        core.backend_mut().push_events(events);
        core.system_update()
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn ticks_without_quit_keep_running() {
        let mut core = core();
        for _ in 0..5 {
            assert!(core.system_update());
        }
    }

    #[test]
    fn quit_is_monotonic() {
        let mut core = core();
        assert!(!tick_with(&mut core, vec![NativeEvent::Quit, NativeEvent::FocusGained]));
        assert!(!core.system_update());
        assert!(!tick_with(&mut core, vec![NativeEvent::KeyDown { key: KeyCode::KeyA }]));
        assert!(!core.is_running());
    }

    #[test]
    fn events_after_quit_in_same_batch_are_processed() {
        let mut core = core();
        tick_with(&mut core, vec![NativeEvent::Quit, NativeEvent::KeyDown { key: KeyCode::KeyQ }]);
        assert!(core.input().key_state(KeyCode::KeyQ));
    }

    #[test]
    fn shutdown_runs_once() {
        let mut core = core();
        core.shutdown();
        core.shutdown();
        assert!(core.backend().is_torn_down());
        assert!(!core.system_update());
    }

    #[test]
    fn joysticks_connected_at_startup_are_registered() {
        let core = Core::new(HeadlessBackend::new().with_joysticks(vec![0, 2]), config()).unwrap();
        assert_eq!(core.input().joystick_ids().collect::<Vec<_>>(), vec![0, 2]);
    }

    //=====================================================================
    // Video Mode Tests
    //=====================================================================

    #[test]
    fn resolution_change_keeps_context() {
        let mut core = core();
        let context = core.context_handle();
        assert!(context.is_some());

        let video = core.config().video.with_resolution(1280, 720);
        core.set_video_mode(video).unwrap();

        assert_eq!(core.context_handle(), context);
        assert_eq!(core.backend().windows_created(), 1);
        assert_eq!((core.width(), core.height()), (1280, 720));
    }

    #[test]
    fn set_video_mode_dispatches_one_resize() {
        let log = SizeLog::default();
        let mut core =
            Core::with_renderer(HeadlessBackend::new(), config(), Box::new(log.clone())).unwrap();
        let events = core.subscribe();

        let video = core.config().video.with_resolution(640, 480);
        core.set_video_mode(video).unwrap();

        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![CoreEvent::Resized]);
        assert_eq!(log.0.borrow().last(), Some(&(640, 480)));
    }

    #[test]
    fn retina_mode_tracks_physical_size() {
        let log = SizeLog::default();
        let config = CoreBuilder::new().with_frame_rate(0).with_retina(true).build();
        let backend = HeadlessBackend::new().with_scale_factor(2.0);
        let mut core = Core::with_renderer(backend, config, Box::new(log.clone())).unwrap();

        assert_eq!((core.width(), core.height()), (1600, 1200));
        assert_eq!(log.0.borrow().last(), Some(&(1600, 1200)));

        let video = core.config().video.with_resolution(640, 480);
        core.set_video_mode(video).unwrap();
        assert_eq!((core.width(), core.height()), (1280, 960));
        assert_eq!(log.0.borrow().last(), Some(&(1280, 960)));
    }

    #[test]
    fn vsync_prefers_adaptive_then_falls_back() {
        let core = core();
        assert_eq!(core.backend().swap_modes(), &[SwapMode::VSync]);

        let core = Core::new(HeadlessBackend::new().with_adaptive_vsync(true), config()).unwrap();
        assert_eq!(core.backend().swap_modes(), &[SwapMode::Adaptive]);

        let config = CoreBuilder::new().with_frame_rate(0).with_vsync(false).build();
        let core = Core::new(HeadlessBackend::new(), config).unwrap();
        assert_eq!(core.backend().swap_modes(), &[SwapMode::Immediate]);
    }

    #[test]
    fn window_flags_follow_settings() {
        let config = CoreBuilder::new()
            .with_frame_rate(0)
            .with_fullscreen(true)
            .with_retina(true)
            .with_resizable(true)
            .with_aa_level(4)
            .build();
        let core = Core::new(HeadlessBackend::new(), config).unwrap();
        let settings = &core.backend().window().unwrap().settings;

        assert!(settings.flags.contains(
            WindowFlags::OPENGL | WindowFlags::FULLSCREEN | WindowFlags::RESIZABLE | WindowFlags::HIGH_DPI
        ));
        assert_eq!(settings.pixel_format.samples, Some(4));
    }

    #[test]
    fn video_modes_come_from_backend() {
        let modes = vec![VideoMode { width: 640, height: 480 }, VideoMode { width: 640, height: 480 }];
        let core = Core::new(HeadlessBackend::new().with_video_modes(modes.clone()), config()).unwrap();
        assert_eq!(core.video_modes(), modes);
        assert_eq!(core.screen_info().map(|s| s.width), Some(640));
    }

    #[test]
    fn resize_to_touches_renderer_only() {
        let log = SizeLog::default();
        let mut core =
            Core::with_renderer(HeadlessBackend::new(), config(), Box::new(log.clone())).unwrap();

        core.resize_to(320, 200);

        assert_eq!(log.0.borrow().last(), Some(&(320, 200)));
        assert_eq!((core.width(), core.height()), (800, 600));
        assert_eq!(core.backend().native_resizes(), 0);
    }

    //=====================================================================
    // Resize Event Tests
    //=====================================================================

    #[test]
    fn native_resize_dispatches_exactly_once() {
        let config = CoreBuilder::new().with_frame_rate(0).with_resolution(1024, 768).build();
        let log = SizeLog::default();
        let mut core =
            Core::with_renderer(HeadlessBackend::new(), config, Box::new(log.clone())).unwrap();
        let events = core.subscribe();

        tick_with(&mut core, vec![NativeEvent::Resized { width: 800, height: 600 }]);

        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![CoreEvent::Resized]);
        assert_eq!((core.width(), core.height()), (800, 600));
        assert_eq!(log.0.borrow().last(), Some(&(800, 600)));
        assert_eq!(core.backend().native_resizes(), 1);
    }

    #[test]
    fn resize_centers_only_fixed_windows() {
        let mut core = core();
        tick_with(&mut core, vec![NativeEvent::Resized { width: 640, height: 480 }]);
        assert!(core.window_state().centered);

        let config = CoreBuilder::new().with_frame_rate(0).with_resizable(true).build();
        let mut core = Core::new(HeadlessBackend::new(), config).unwrap();
        tick_with(&mut core, vec![NativeEvent::Resized { width: 640, height: 480 }]);
        assert!(!core.window_state().centered);
        assert!(!core.backend().window().unwrap().centered);
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn ctrl_shift_z_is_redo_and_ctrl_z_is_undo() {
        let mut core = core();
        let events = core.subscribe();

        tick_with(
            &mut core,
            vec![
                NativeEvent::KeyDown { key: KeyCode::ControlLeft },
                NativeEvent::KeyDown { key: KeyCode::ShiftRight },
                NativeEvent::KeyDown { key: KeyCode::KeyZ },
                NativeEvent::KeyUp { key: KeyCode::KeyZ },
                NativeEvent::KeyUp { key: KeyCode::ShiftRight },
                NativeEvent::KeyDown { key: KeyCode::KeyZ },
            ],
        );

        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![CoreEvent::Redo, CoreEvent::Undo]);
    }

    #[test]
    fn consumed_key_down_is_not_recorded_but_key_up_is() {
        let mut core = core();
        tick_with(
            &mut core,
            vec![
                NativeEvent::KeyDown { key: KeyCode::ControlRight },
                NativeEvent::KeyDown { key: KeyCode::KeyC },
                NativeEvent::KeyUp { key: KeyCode::KeyC },
            ],
        );

        let log = core.input().events();
        assert!(!core.input().key_state(KeyCode::KeyC));
        assert!(!log.iter().any(|e| matches!(e, InputEvent::KeyDown { key: KeyCode::KeyC, .. })));
        assert!(log.iter().any(|e| matches!(e, InputEvent::KeyUp { key: KeyCode::KeyC, .. })));
    }

    #[test]
    fn plain_keys_are_recorded() {
        let mut core = core();
        tick_with(&mut core, vec![NativeEvent::KeyDown { key: KeyCode::KeyC }]);
        assert!(core.input().key_state(KeyCode::KeyC));
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn wheel_reports_direction_only() {
        let mut core = core();
        tick_with(
            &mut core,
            vec![
                NativeEvent::MouseWheel { delta_y: 3.5 },
                NativeEvent::MouseWheel { delta_y: 0.0 },
                NativeEvent::MouseWheel { delta_y: -0.25 },
            ],
        );

        let directions: Vec<_> = core
            .input()
            .events()
            .iter()
            .filter_map(|e| match e {
                InputEvent::MouseWheel { direction, .. } => Some(*direction),
                _ => None,
            })
            .collect();
        assert_eq!(directions, vec![WheelDirection::Up, WheelDirection::Down]);
    }

    #[test]
    fn only_logical_buttons_are_recorded() {
        let mut core = core();
        tick_with(
            &mut core,
            vec![
                NativeEvent::MouseButtonDown { button: NativeMouseButton::Middle },
                NativeEvent::MouseButtonDown { button: NativeMouseButton::Back },
                NativeEvent::MouseButtonDown { button: NativeMouseButton::Other(7) },
            ],
        );

        assert!(core.input().mouse_button_state(MouseButton::Middle));
        assert_eq!(core.input().events().len(), 1);
    }

    #[test]
    fn motion_updates_position_and_delta() {
        let mut core = core();
        tick_with(&mut core, vec![NativeEvent::MouseMotion { x: 10.0, y: 20.0, dx: 2.0, dy: -1.0 }]);
        assert_eq!(core.input().mouse_position(), (10.0, 20.0));
        assert_eq!(core.input().mouse_delta(), (2.0, -1.0));
    }

    #[test]
    fn event_log_holds_only_the_latest_tick() {
        let mut core = core();
        for i in 0..10_000 {
            let x = i as f32;
            tick_with(&mut core, vec![NativeEvent::MouseMotion { x, y: 0.0, dx: 1.0, dy: 0.0 }]);
        }
        assert_eq!(core.input().events().len(), 1);
        assert_eq!(core.input().mouse_position(), (9_999.0, 0.0));

        core.system_update();
        assert!(core.input().events().is_empty());
    }

    #[test]
    fn warp_cursor_reaches_input_on_next_tick() {
        let mut core = core();
        core.warp_cursor(5, 6).unwrap();
        core.system_update();
        assert_eq!(core.input().mouse_position(), (5.0, 6.0));
    }

    #[test]
    fn cursor_controls_reach_backend() {
        let mut core = core();
        core.enable_mouse(false).unwrap();
        core.capture_mouse(true).unwrap();
        core.set_cursor(CursorKind::Text).unwrap();

        let window = core.backend().window().unwrap();
        assert!(!window.mouse_enabled);
        assert!(window.mouse_captured);
        assert_eq!(window.cursor, CursorKind::Text);
    }

    //=====================================================================
    // Joystick & Focus Tests
    //=====================================================================

    #[test]
    fn joystick_events_reach_input() {
        let mut core = core();
        tick_with(
            &mut core,
            vec![
                NativeEvent::JoystickAdded { device: 1 },
                NativeEvent::JoystickAxis { device: 1, axis: 0, value: 0.5 },
                NativeEvent::JoystickButtonDown { device: 1, button: 3 },
            ],
        );

        let pad = core.input().joystick(1).unwrap();
        assert_eq!(pad.axis(0), 0.5);
        assert!(pad.is_button_pressed(3));

        tick_with(&mut core, vec![NativeEvent::JoystickRemoved { device: 1 }]);
        assert!(core.input().joystick(1).is_none());
    }

    #[test]
    fn focus_loss_pauses_when_configured() {
        let config = CoreBuilder::new().with_frame_rate(0).with_pause_on_focus_loss(true).build();
        let mut core = Core::new(HeadlessBackend::new(), config).unwrap();
        let events = core.subscribe();

        tick_with(&mut core, vec![NativeEvent::FocusLost]);
        assert!(!core.has_focus());
        assert!(core.is_paused());
        core.render().unwrap();
        assert_eq!(core.backend().frames_presented(), 0);

        tick_with(&mut core, vec![NativeEvent::FocusGained]);
        assert!(!core.is_paused());
        core.render().unwrap();
        assert_eq!(core.backend().frames_presented(), 1);

        assert_eq!(
            events.try_iter().collect::<Vec<_>>(),
            vec![CoreEvent::FocusLost, CoreEvent::FocusGained]
        );
    }

    #[test]
    fn focus_loss_without_pause_keeps_rendering() {
        let mut core = core();
        tick_with(&mut core, vec![NativeEvent::FocusLost]);
        assert!(!core.is_paused());
    }

    //=====================================================================
    // Shim Tests
    //=====================================================================

    #[test]
    fn event_mutex_is_free_between_ticks() {
        let mut core = core();
        core.system_update();
        assert!(!core.event_mutex().is_locked());
    }

    #[test]
    fn window_title_updates_backend() {
        let mut core = core();
        core.set_window_title("Renamed");
        assert_eq!(core.backend().window().unwrap().settings.title, "Renamed");
    }

    #[cfg(unix)]
    #[test]
    fn external_command_through_core() {
        let core = core();
        let output = core.execute_external_command("printf", "ok", None).unwrap();
        assert_eq!(output.stdout, "ok");
    }

    #[cfg(unix)]
    #[test]
    fn open_url_returns_before_opener_exits() {
        let config = CoreBuilder::new().with_frame_rate(0).with_url_opener("sleep").build();
        let core = Core::new(HeadlessBackend::new(), config).unwrap();

        let start = std::time::Instant::now();
        core.open_url("3").unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[cfg(unix)]
    #[test]
    fn open_url_hands_url_to_opener() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("opened");
        let config = CoreBuilder::new().with_frame_rate(0).with_url_opener("touch").build();
        let core = Core::new(HeadlessBackend::new(), config).unwrap();

        core.open_url(marker.to_str().unwrap()).unwrap();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !marker.exists() {
            assert!(std::time::Instant::now() < deadline, "opener never ran");
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }

    #[test]
    fn missing_url_opener_is_a_launch_error() {
        let config =
            CoreBuilder::new().with_frame_rate(0).with_url_opener("aetheric-no-such-opener").build();
        let core = Core::new(HeadlessBackend::new(), config).unwrap();
        assert!(matches!(core.open_url("https://example.com"), Err(PlatformError::Launch { .. })));
    }
}
