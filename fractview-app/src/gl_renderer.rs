use eframe::glow::{self, HasContext};
use tracing::{error, info};

use fractview_core::Vec2;
use fractview_render::Engine;

use crate::glow_device::GlowDevice;

/// The engine plus the GL objects it draws with.
///
/// Lives behind a mutex shared with egui paint callbacks, which run on the
/// GL thread during painting.
pub(crate) struct GlRenderer {
    engine: Engine<glow::Program>,
    /// The fullscreen quad needs no vertex data, but core profiles still
    /// require a bound vertex array.
    vao: Option<glow::VertexArray>,
    lost: bool,
}

impl GlRenderer {
    pub(crate) fn new(gl: &glow::Context, engine: Engine<glow::Program>) -> Result<Self, String> {
        // SAFETY: called from the creation context, on the GL thread.
        let vao = unsafe { gl.create_vertex_array()? };
        Ok(Self {
            engine,
            vao: Some(vao),
            lost: false,
        })
    }

    pub(crate) fn is_lost(&self) -> bool {
        self.lost
    }

    /// Run one engine frame into the current viewport.
    pub(crate) fn paint(&mut self, gl: &glow::Context, dt: f32, size: Vec2<f32>) {
        let Some(vao) = self.vao else {
            return;
        };
        if self.lost {
            return;
        }
        let mut device = GlowDevice::new(gl, vao);
        if let Err(e) = self.engine.frame(&mut device, dt, size) {
            error!("Stopping renderer: {e}");
            self.engine.shutdown(&mut device);
            self.lost = true;
        }
    }

    /// Release every GL object. Safe to call more than once.
    pub(crate) fn destroy(&mut self, gl: &glow::Context) {
        let Some(vao) = self.vao.take() else {
            return;
        };
        let mut device = GlowDevice::new(gl, vao);
        self.engine.shutdown(&mut device);
        // SAFETY: the vertex array was created on this context and is no longer bound.
        unsafe { gl.delete_vertex_array(vao) };
        info!("GL resources released");
    }
}
