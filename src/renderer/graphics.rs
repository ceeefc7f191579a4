use std::ffi::c_void;

use glam::{Mat4, Vec4};

use crate::renderer::gl;
use crate::renderer::gltf::{BufferTarget, ComponentType, DrawMode};

/// How one vertex attribute reads its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    pub components: i32,
    pub component_type: ComponentType,
    pub normalized: bool,
    /// 0 means tightly packed.
    pub stride: i32,
    pub byte_offset: usize,
}

/// The slice of a GLES/WebGL context the viewer uses. Uniform uploads apply
/// to the program most recently returned by `create_program`.
pub trait Graphics {
    type Buffer;
    type Program;

    fn clear(&mut self, color: Vec4);

    /// Creates a buffer object and uploads `data` into it.
    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> Self::Buffer;

    /// Compiles, links and starts using a program. `None` if a shader or
    /// program object could not be created; compile and link errors are not
    /// reported.
    fn create_program(&mut self, vertex_source: &str, fragment_source: &str)
        -> Option<Self::Program>;

    fn attribute_location(&mut self, program: &Self::Program, name: &str) -> Option<u32>;

    fn uniform_location(&mut self, program: &Self::Program, name: &str) -> Option<i32>;

    fn uniform_vec4(&mut self, location: Option<i32>, value: Vec4);

    fn uniform_mat4(&mut self, location: Option<i32>, value: &Mat4);

    fn vertex_attribute(&mut self, buffer: &Self::Buffer, location: u32, layout: &AttributeLayout);

    fn draw_elements(
        &mut self,
        index_buffer: &Self::Buffer,
        mode: DrawMode,
        count: i32,
        index_type: ComponentType,
        byte_offset: usize,
    );

    fn draw_arrays(&mut self, mode: DrawMode, count: i32);
}

/// [`Graphics`] over the generated GLES 3.0 bindings. Requires a current GL
/// context on the calling thread.
pub struct GlGraphics {
    enabled_attributes: Vec<gl::types::GLuint>,
}

/// Deleted when dropped.
pub struct GlBuffer(gl::types::GLuint);

/// Deleted when dropped.
pub struct GlProgram(gl::types::GLuint);

impl GlGraphics {
    /// Loads the GL function pointers and sets up the viewport.
    pub fn load_with(
        loader: impl FnMut(&'static str) -> *const c_void,
        width: i32,
        height: i32,
    ) -> GlGraphics {
        gl::load_with(loader);
        gl::call!(gl::Viewport(0, 0, width, height));
        GlGraphics {
            enabled_attributes: Vec::new(),
        }
    }

    /// Attribute arrays would otherwise keep pointing at buffers that are
    /// deleted as soon as the draw returns.
    fn disable_attributes(&mut self) {
        for location in self.enabled_attributes.drain(..) {
            gl::call!(gl::DisableVertexAttribArray(location));
        }
    }
}

impl Graphics for GlGraphics {
    type Buffer = GlBuffer;
    type Program = GlProgram;

    fn clear(&mut self, color: Vec4) {
        gl::call!(gl::ClearColor(color.x, color.y, color.z, color.w));
        gl::call!(gl::Clear(gl::COLOR_BUFFER_BIT));
    }

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> GlBuffer {
        let mut buffer = 0;
        gl::call!(gl::GenBuffers(1, &mut buffer));
        gl::call!(gl::BindBuffer(target.gl_enum(), buffer));
        gl::buffer_data(target.gl_enum(), data, gl::STATIC_DRAW);
        GlBuffer(buffer)
    }

    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Option<GlProgram> {
        let vertex_shader = gl::create_shader(gl::VERTEX_SHADER, vertex_source)?;
        let Some(fragment_shader) = gl::create_shader(gl::FRAGMENT_SHADER, fragment_source) else {
            gl::call!(gl::DeleteShader(vertex_shader));
            return None;
        };
        let program = gl::create_program(&[vertex_shader, fragment_shader]);
        gl::call!(gl::DeleteShader(vertex_shader));
        gl::call!(gl::DeleteShader(fragment_shader));
        let program = GlProgram(program?);
        gl::call!(gl::UseProgram(program.0));
        Some(program)
    }

    fn attribute_location(&mut self, program: &GlProgram, name: &str) -> Option<u32> {
        gl::get_attrib_location(program.0, name)
    }

    fn uniform_location(&mut self, program: &GlProgram, name: &str) -> Option<i32> {
        gl::get_uniform_location(program.0, name)
    }

    fn uniform_vec4(&mut self, location: Option<i32>, value: Vec4) {
        if let Some(location) = location {
            gl::call!(gl::Uniform4f(location, value.x, value.y, value.z, value.w));
        }
    }

    fn uniform_mat4(&mut self, location: Option<i32>, value: &Mat4) {
        if let Some(location) = location {
            let columns: &[f32; 16] = bytemuck::cast_ref(value);
            gl::call!(gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr()));
        }
    }

    fn vertex_attribute(&mut self, buffer: &GlBuffer, location: u32, layout: &AttributeLayout) {
        gl::call!(gl::BindBuffer(gl::ARRAY_BUFFER, buffer.0));
        gl::call!(gl::EnableVertexAttribArray(location));
        gl::call!(gl::VertexAttribPointer(
            location,
            layout.components,
            layout.component_type.gl_enum(),
            if layout.normalized { gl::TRUE } else { gl::FALSE },
            layout.stride,
            layout.byte_offset as *const c_void,
        ));
        self.enabled_attributes.push(location);
    }

    fn draw_elements(
        &mut self,
        index_buffer: &GlBuffer,
        mode: DrawMode,
        count: i32,
        index_type: ComponentType,
        byte_offset: usize,
    ) {
        gl::call!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, index_buffer.0));
        gl::call!(gl::DrawElements(
            mode.gl_enum(),
            count,
            index_type.gl_enum(),
            byte_offset as *const c_void,
        ));
        self.disable_attributes();
    }

    fn draw_arrays(&mut self, mode: DrawMode, count: i32) {
        gl::call!(gl::DrawArrays(mode.gl_enum(), 0, count));
        self.disable_attributes();
    }
}

impl Drop for GlBuffer {
    fn drop(&mut self) {
        gl::call!(gl::DeleteBuffers(1, &self.0));
    }
}

impl Drop for GlProgram {
    fn drop(&mut self) {
        gl::call!(gl::DeleteProgram(self.0));
    }
}
