#![allow(clippy::all, dead_code, unused_imports)]

use std::ffi::{c_void, CString};

use tracing::debug;

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

macro_rules! call {
    ($expr:expr) => {{
        #[allow(unused_unsafe)]
        let result = unsafe { $expr };
        if cfg!(debug_assertions) {
            let error = unsafe { $crate::renderer::gl::GetError() };
            if error != $crate::renderer::gl::NO_ERROR {
                tracing::error!(
                    "OpenGL error {} at {}:{}:{}",
                    $crate::renderer::gl::error_name(error),
                    file!(),
                    line!(),
                    column!(),
                );
            }
        }
        result
    }};
}
pub(crate) use call;

pub fn error_name(error: types::GLenum) -> String {
    match error {
        INVALID_ENUM => "INVALID_ENUM".to_owned(),
        INVALID_VALUE => "INVALID_VALUE".to_owned(),
        INVALID_OPERATION => "INVALID_OPERATION".to_owned(),
        OUT_OF_MEMORY => "OUT_OF_MEMORY".to_owned(),
        INVALID_FRAMEBUFFER_OPERATION => "INVALID_FRAMEBUFFER_OPERATION".to_owned(),
        _ => format!("{error}"),
    }
}

pub fn buffer_data<T: bytemuck::Pod>(target: types::GLenum, data: &[T], usage: types::GLenum) {
    let data: &[u8] = bytemuck::cast_slice(data);
    call!(BufferData(
        target,
        data.len() as types::GLsizeiptr,
        data.as_ptr() as *const c_void,
        usage,
    ));
}

/// Creates and compiles a shader. Returns `None` only if the shader object
/// could not be created; compile failures are logged and otherwise ignored.
pub fn create_shader(type_: types::GLenum, source: &str) -> Option<types::GLuint> {
    let shader = call!(CreateShader(type_));
    if shader == 0 {
        return None;
    }
    let sources = [source.as_bytes().as_ptr() as *const types::GLchar];
    let source_lens = [source.len() as types::GLint];
    call!(ShaderSource(shader, 1, sources.as_ptr(), source_lens.as_ptr()));
    call!(CompileShader(shader));
    let mut compile_status = 0;
    call!(GetShaderiv(shader, COMPILE_STATUS, &mut compile_status));
    if compile_status == FALSE as types::GLint {
        let mut info_log = [0u8; 4096];
        let mut length = 0;
        call!(GetShaderInfoLog(
            shader,
            info_log.len() as types::GLsizei,
            &mut length,
            info_log.as_mut_ptr() as *mut types::GLchar,
        ));
        let info_log = String::from_utf8_lossy(&info_log[..length.max(0) as usize]);
        debug!("compiling shader failed: {info_log}");
    }
    Some(shader)
}

/// Links the shaders into a program. Same failure rules as [`create_shader`].
pub fn create_program(shaders: &[types::GLuint]) -> Option<types::GLuint> {
    let program = call!(CreateProgram());
    if program == 0 {
        return None;
    }
    for &shader in shaders {
        call!(AttachShader(program, shader));
    }
    call!(LinkProgram(program));
    let mut link_status = 0;
    call!(GetProgramiv(program, LINK_STATUS, &mut link_status));
    if link_status == FALSE as types::GLint {
        let mut info_log = [0u8; 4096];
        let mut length = 0;
        call!(GetProgramInfoLog(
            program,
            info_log.len() as types::GLsizei,
            &mut length,
            info_log.as_mut_ptr() as *mut types::GLchar,
        ));
        let info_log = String::from_utf8_lossy(&info_log[..length.max(0) as usize]);
        debug!("linking shader program failed: {info_log}");
    }
    Some(program)
}

pub fn get_attrib_location(program: types::GLuint, name: &str) -> Option<types::GLuint> {
    let name = CString::new(name).ok()?;
    let location = call!(GetAttribLocation(program, name.as_ptr()));
    types::GLuint::try_from(location).ok()
}

pub fn get_uniform_location(program: types::GLuint, name: &str) -> Option<types::GLint> {
    let name = CString::new(name).ok()?;
    let location = call!(GetUniformLocation(program, name.as_ptr()));
    (location != -1).then_some(location)
}
