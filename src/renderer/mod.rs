use glam::Vec4;

mod draw_calls;
pub(crate) mod gl;
pub mod gltf;
mod graphics;
#[cfg(test)]
pub(crate) mod recording;

pub use graphics::{AttributeLayout, GlBuffer, GlGraphics, GlProgram, Graphics};

use crate::renderer::gltf::{draw_scene, FrameContext, Gltf, TransformStack};

/// Draws whole frames of a glTF scene. Nothing is cached between frames:
/// every pass uploads its buffers and builds its programs again.
pub struct Renderer<G: Graphics> {
    gfx: G,
    clear_color: Vec4,
}

impl<G: Graphics> Renderer<G> {
    pub fn new(gfx: G, clear_color: Vec4) -> Renderer<G> {
        Renderer { gfx, clear_color }
    }

    pub fn graphics(&self) -> &G {
        &self.gfx
    }

    pub fn graphics_mut(&mut self) -> &mut G {
        &mut self.gfx
    }

    pub fn render(&mut self, gltf: &Gltf, transforms: &mut TransformStack) {
        self.gfx.clear(self.clear_color);
        draw_scene(&mut FrameContext {
            gfx: &mut self.gfx,
            gltf,
            transforms,
        });
    }
}
