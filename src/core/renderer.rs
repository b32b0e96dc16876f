//=========================================================================
// OpenGL Renderer
//
// Default renderer registered by the core: owns the viewport, the clear
// pass and the fixed state toggles (depth test, multisampling). Scene
// drawing is left to installed modules.
//
// Without a GL context (headless backend) it only tracks its size.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Arc;

//=== External Crates =====================================================

use glow::HasContext;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::services::Renderer;

//=== GlRenderer ==========================================================

pub struct GlRenderer {
    gl: Option<Arc<glow::Context>>,
    size: (u32, u32),
    clear_color: [f32; 4],
    multisample: bool,
    anisotropy: u8,
    frames: u64,
}

impl GlRenderer {
    pub fn new(aa_level: u8, anisotropy: u8) -> Self {
        Self {
            gl: None,
            size: (0, 0),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            multisample: aa_level > 0,
            anisotropy,
            frames: 0,
        }
    }

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
    }

    /// Current viewport size.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Anisotropic filtering level requested for textures.
    pub fn anisotropy(&self) -> u8 {
        self.anisotropy
    }

    /// Frames completed since startup.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn apply_viewport(&self) {
        if let Some(gl) = &self.gl {
            let (w, h) = self.size;
            // SAFETY: the context is current on this thread for the
            // lifetime of the core.
            unsafe {
                gl.viewport(0, 0, w as i32, h as i32);
            }
        }
    }
}

impl Renderer for GlRenderer {
    fn init(&mut self, gl: Option<Arc<glow::Context>>) {
        if let Some(gl) = &gl {
            // SAFETY: see `apply_viewport`.
            unsafe {
                gl.enable(glow::DEPTH_TEST);
                if self.multisample {
                    gl.enable(glow::MULTISAMPLE);
                } else {
                    gl.disable(glow::MULTISAMPLE);
                }
                info!(
                    target: "core",
                    "OpenGL renderer ready: {}",
                    gl.get_parameter_string(glow::VERSION)
                );
            }
        } else {
            debug!(target: "core", "Renderer running without GL context");
        }
        self.gl = gl;
        self.apply_viewport();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.apply_viewport();
    }

    fn begin_render(&mut self) {
        if let Some(gl) = &self.gl {
            let [r, g, b, a] = self.clear_color;
            // SAFETY: see `apply_viewport`.
            unsafe {
                gl.clear_color(r, g, b, a);
                gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            }
        }
    }

    fn end_render(&mut self) {
        self.frames += 1;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
