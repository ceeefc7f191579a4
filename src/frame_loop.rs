use glam::{Mat4, Vec3};

use crate::config::ViewerConfig;
use crate::renderer::gltf::{Gltf, TransformStack};
use crate::renderer::{Graphics, Renderer};


/// The host's "call me again on the next display refresh" facility.
pub trait Scheduler {
    fn request_frame(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No frame has been requested yet.
    Idle,
    /// A frame callback is pending.
    Scheduled,
    /// Inside a frame callback.
    Rendering,
}

/// Spins the scene's root transform by a fixed step once per frame. Runs
/// until the host goes away; there is no way to stop it.
pub struct FrameLoop<S: Scheduler> {
    scheduler: S,
    state: FrameState,
    transforms: TransformStack,
    rotation_step: f32,
    rotation_axis: Vec3,
}

impl<S: Scheduler> FrameLoop<S> {
    pub fn new(scheduler: S, config: &ViewerConfig) -> FrameLoop<S> {
        FrameLoop {
            scheduler,
            state: FrameState::Idle,
            transforms: TransformStack::new(Mat4::IDENTITY),
            rotation_step: config.rotation_step,
            rotation_axis: config.rotation_axis.normalize(),
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn root_transform(&self) -> Mat4 {
        self.transforms.root()
    }

    /// Requests the first frame. Does nothing once the loop is running.
    pub fn start(&mut self) {
        if self.state == FrameState::Idle {
            self.scheduler.request_frame();
            self.state = FrameState::Scheduled;
        }
    }

    /// The frame callback. The next frame is requested before anything is
    /// drawn, so a bad frame never stalls the loop.
    pub fn tick<G: Graphics>(&mut self, renderer: &mut Renderer<G>, gltf: &Gltf) {
        self.state = FrameState::Rendering;
        self.scheduler.request_frame();

        let root = self.transforms.root_mut();
        *root *= Mat4::from_axis_angle(self.rotation_axis, self.rotation_step);
        renderer.render(gltf, &mut self.transforms);

        self.state = FrameState::Scheduled;
    }
}
