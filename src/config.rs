use glam::{Vec3, Vec4};

/// Fixed settings of the viewer. There is no command line or config file;
/// `main` always runs with [`ViewerConfig::default`].
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Request an alpha channel for the default framebuffer.
    pub alpha: bool,
    pub clear_color: Vec4,
    /// Directory the manifest and its buffers are read from.
    pub asset_root: &'static str,
    /// Manifest location, relative to `asset_root`.
    pub manifest_path: &'static str,
    /// Radians added to the root transform's rotation every frame.
    pub rotation_step: f32,
    pub rotation_axis: Vec3,
    /// `tracing-subscriber` filter directive.
    pub log_filter: &'static str,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            canvas_width: 300,
            canvas_height: 300,
            alpha: true,
            clear_color: Vec4::ZERO,
            // Emscripten preloads the assets into the root of its virtual
            // filesystem.
            asset_root: if cfg!(target_family = "wasm") { "/" } else { "assets" },
            manifest_path: "box.gltf",
            rotation_step: 0.05,
            rotation_axis: Vec3::new(0.2, 0.3, 0.2),
            log_filter: "info",
        }
    }
}
