//=========================================================================
// Core Services
//
// Service locator holding the active renderer and installed modules.
//
// ```text
//   Core::render()
//     └─► Services::render()
//           ├─ renderer.begin_render()
//           ├─ module.render(renderer)   (installation order)
//           └─ renderer.end_render()
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Arc;

//=== External Crates =====================================================

use log::{debug, info};

//=== Renderer ============================================================

/// Rendering collaborator driven by the core.
///
/// The core owns when rendering happens; the renderer owns what is drawn.
pub trait Renderer {
    /// Receives the GL function table once a context exists. Backends
    /// without a GL context pass `None`.
    fn init(&mut self, gl: Option<Arc<glow::Context>>) {
        let _ = gl;
    }

    /// Resizes the viewport.
    fn resize(&mut self, width: u32, height: u32);

    fn begin_render(&mut self);

    fn end_render(&mut self);
}

//=== CoreModule ==========================================================

/// Engine module installed into the service locator.
pub trait CoreModule {
    fn name(&self) -> &str;

    /// Draws between `begin_render` and `end_render`.
    fn render(&mut self, renderer: &mut dyn Renderer) {
        let _ = renderer;
    }
}

//=== Services ============================================================

#[derive(Default)]
pub struct Services {
    renderer: Option<Box<dyn Renderer>>,
    modules: Vec<Box<dyn CoreModule>>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the active renderer, replacing any previous one.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        if self.renderer.is_some() {
            debug!(target: "core", "Replacing active renderer");
        }
        self.renderer = Some(renderer);
    }

    pub fn renderer_mut(&mut self) -> Option<&mut (dyn Renderer + 'static)> {
        self.renderer.as_deref_mut()
    }

    pub fn install_module(&mut self, module: Box<dyn CoreModule>) {
        info!(target: "core", "Installing module '{}'", module.name());
        self.modules.push(module);
    }

    /// Names of installed modules, in installation order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Renders one frame. No-op without a renderer.
    pub fn render(&mut self) {
        let Some(renderer) = self.renderer.as_deref_mut() else {
            return;
        };

        renderer.begin_render();
        for module in &mut self.modules {
            module.render(renderer);
        }
        renderer.end_render();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
