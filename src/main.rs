use std::cell::RefCell;
use std::ffi::c_void;

use gltf_viewer::config::ViewerConfig;
use gltf_viewer::frame_loop::{FrameLoop, Scheduler};
use gltf_viewer::renderer::gltf::{self, FileFetch, Gltf};
use gltf_viewer::renderer::{GlGraphics, Renderer};
use sdl2::event::Event;
use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::{EventPump, Sdl, VideoSubsystem};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[cfg(target_family = "wasm")]
mod emscripten_h;

fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::default();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter))
        .init();

    let sdl_context = sdl2::init().map_err(SdlErr)?;
    let video_subsystem = sdl_context.video().map_err(SdlErr)?;
    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::GLES);
    gl_attr.set_context_version(3, 0);
    gl_attr.set_alpha_size(if config.alpha { 8 } else { 0 });
    let window = video_subsystem
        .window(
            env!("CARGO_PKG_NAME"),
            config.canvas_width,
            config.canvas_height,
        )
        .opengl()
        .build()?;
    let Ok(gl_context) = window.gl_create_context() else {
        debug!("no GL context, nothing to draw on");
        return Ok(());
    };
    let event_pump = sdl_context.event_pump().map_err(SdlErr)?;

    let gfx = GlGraphics::load_with(
        |s| video_subsystem.gl_get_proc_address(s) as *const c_void,
        config.canvas_width as i32,
        config.canvas_height as i32,
    );
    let fetcher = FileFetch::new(config.asset_root);
    let gltf = futures::executor::block_on(gltf::load(&fetcher, config.manifest_path))?;
    info!("loaded {}", config.manifest_path);

    let mut frame_loop = FrameLoop::new(HostScheduler::default(), &config);
    frame_loop.start();
    STATE.with(|state| {
        *state.borrow_mut() = Some(State {
            renderer: Renderer::new(gfx, config.clear_color),
            frame_loop,
            gltf,
            event_pump,
            window,
            _gl_context: gl_context,
            _video: video_subsystem,
            _sdl: sdl_context,
        })
    });

    // On the web, the frames run from requestAnimationFrame callbacks after
    // main has returned.
    #[cfg(not(target_family = "wasm"))]
    while STATE.with(|state| {
        state
            .borrow_mut()
            .as_mut()
            .is_some_and(|state| state.frame_loop.scheduler_mut().take_pending())
    }) {
        run_frame();
    }
    Ok(())
}

thread_local! {
    static STATE: RefCell<Option<State>> = const { RefCell::new(None) };
}

struct State {
    renderer: Renderer<GlGraphics>,
    frame_loop: FrameLoop<HostScheduler>,
    gltf: Gltf,
    event_pump: EventPump,
    window: Window,
    // Dropped last, in this order.
    _gl_context: GLContext,
    _video: VideoSubsystem,
    _sdl: Sdl,
}

#[derive(Default)]
struct HostScheduler {
    pending: bool,
}

impl HostScheduler {
    #[cfg_attr(target_family = "wasm", allow(dead_code))]
    fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl Scheduler for HostScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        #[cfg(target_family = "wasm")]
        emscripten_h::request_animation_frame(animation_frame);
    }
}

#[cfg(target_family = "wasm")]
extern "C" fn animation_frame(_time: f64, _user_data: *mut c_void) -> std::ffi::c_int {
    run_frame();
    0
}

fn run_frame() {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let Some(State {
            renderer,
            frame_loop,
            gltf,
            event_pump,
            window,
            ..
        }) = state.as_mut()
        else {
            return;
        };

        for event in event_pump.poll_iter() {
            if let Event::Quit { .. } = event {
                std::process::exit(0);
            }
        }

        frame_loop.tick(renderer, gltf);
        window.gl_swap_window();
    });
}

#[derive(Debug, Error)]
#[error("sdl error: {0}")]
pub struct SdlErr(String);
