//=========================================================================
// Core Configuration
//
// Fluent builder for the settings the core is initialized with.
//
// ```text
//     CoreBuilder ──build()──> CoreConfig ──Core::new(backend, config)──> Core
//         │
//         ├─ with_resolution()      ├─ with_frame_rate()
//         ├─ with_fullscreen()      ├─ with_monitor()
//         ├─ with_vsync()           ├─ with_retina()
//         ├─ with_aa_level()        ├─ with_resizable()
//         ├─ with_anisotropy()      ├─ with_pause_on_focus_loss()
//         └─ with_title()           └─ with_url_opener()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Imports ====================================================

use crate::os::DEFAULT_URL_OPENER;

//=== VideoSettings =======================================================

/// Parameters of [`crate::core::Core::set_video_mode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    /// Multisample count; 0 disables multisampling.
    pub aa_level: u8,
    pub anisotropy: u8,
    /// Requests a HiDPI (retina) backing surface.
    pub retina: bool,
}

impl VideoSettings {
    /// Same settings at a different resolution.
    pub fn with_resolution(&self, width: u32, height: u32) -> Self {
        Self { width, height, ..self.clone() }
    }
}

//=== CoreConfig ==========================================================

/// Complete startup configuration of a [`crate::core::Core`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub title: String,
    pub video: VideoSettings,
    /// Target ticks per second; 0 disables pacing.
    pub frame_rate: u32,
    pub monitor_index: usize,
    pub resizable: bool,
    pub pause_on_focus_loss: bool,
    /// Program `Core::open_url` hands URLs to.
    pub url_opener: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreBuilder::new().build()
    }
}

//=== CoreBuilder =========================================================

/// Builder for [`CoreConfig`].
///
/// # Default Values
///
/// - **Title**: "Aetheric Engine"
/// - **Resolution**: 800×600, windowed, vsync on, no AA, no anisotropy
/// - **Frame rate**: 60
/// - **Monitor**: 0
/// - **Resizable**: false
/// - **URL opener**: `xdg-open`
///
/// # Examples
///
/// ```
/// use aetheric_platform::core::CoreBuilder;
///
/// let config = CoreBuilder::new()
///     .with_title("Editor")
///     .with_resolution(1280, 720)
///     .with_aa_level(4)
///     .with_resizable(true)
///     .build();
///
/// assert_eq!(config.video.width, 1280);
/// assert!(config.resizable);
/// ```
#[derive(Debug, Clone)]
pub struct CoreBuilder {
    config: CoreConfig,
}

impl CoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: CoreConfig {
                title: "Aetheric Engine".to_string(),
                video: VideoSettings {
                    width: 800,
                    height: 600,
                    fullscreen: false,
                    vsync: true,
                    aa_level: 0,
                    anisotropy: 0,
                    retina: false,
                },
                frame_rate: 60,
                monitor_index: 0,
                resizable: false,
                pause_on_focus_loss: false,
                url_opener: DEFAULT_URL_OPENER.to_string(),
            },
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the initial window size in pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Resolution must be non-zero, got {}x{}", width, height);
        self.config.video.width = width;
        self.config.video.height = height;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.config.video.fullscreen = fullscreen;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.video.vsync = vsync;
        self
    }

    /// Sets the multisample count (0, 2, 4, 8, 16).
    ///
    /// # Panics
    ///
    /// Panics if `aa_level` is not 0 or a power of two up to 16.
    pub fn with_aa_level(mut self, aa_level: u8) -> Self {
        assert!(
            aa_level == 0 || (aa_level.is_power_of_two() && aa_level <= 16),
            "AA level must be 0 or a power of two up to 16, got {}",
            aa_level
        );
        self.config.video.aa_level = aa_level;
        self
    }

    pub fn with_anisotropy(mut self, anisotropy: u8) -> Self {
        self.config.video.anisotropy = anisotropy;
        self
    }

    pub fn with_retina(mut self, retina: bool) -> Self {
        self.config.video.retina = retina;
        self
    }

    /// Sets the target ticks per second. 0 disables pacing.
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.config.frame_rate = frame_rate;
        self
    }

    /// Selects the monitor used for fullscreen and video-mode queries.
    pub fn with_monitor(mut self, monitor_index: usize) -> Self {
        self.config.monitor_index = monitor_index;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.config.resizable = resizable;
        self
    }

    /// Pauses the core while the window is unfocused.
    pub fn with_pause_on_focus_loss(mut self, pause: bool) -> Self {
        self.config.pause_on_focus_loss = pause;
        self
    }

    /// Sets the program that receives URLs, e.g. `open` or a browser.
    pub fn with_url_opener(mut self, opener: impl Into<String>) -> Self {
        self.config.url_opener = opener.into();
        self
    }

    pub fn build(self) -> CoreConfig {
        let video = &self.config.video;
        info!(
            target: "core",
            "Core config: {}x{} fullscreen={} vsync={} aa={} @ {} fps",
            video.width, video.height, video.fullscreen, video.vsync, video.aa_level,
            self.config.frame_rate
        );
        self.config
    }
}

impl Default for CoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
