use core::ffi::{c_int, c_long, c_void};
use std::ptr;

/// Runs `func` once, on the browser's next animation frame.
pub fn request_animation_frame(func: EmAnimationFrameCallback) -> c_long {
    unsafe { emscripten_request_animation_frame(func, ptr::null_mut()) }
}

pub type EmAnimationFrameCallback = extern "C" fn(time: f64, user_data: *mut c_void) -> c_int;
extern "C" {
    /// https://emscripten.org/docs/api_reference/html5.h.html#c.emscripten_request_animation_frame
    pub fn emscripten_request_animation_frame(
        func: EmAnimationFrameCallback,
        user_data: *mut c_void,
    ) -> c_long;
}
