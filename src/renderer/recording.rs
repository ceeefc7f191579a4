//! A [`Graphics`] that draws nothing and remembers every call.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Mat4, Vec4};

use crate::renderer::gltf::{BufferTarget, ComponentType, DrawMode};
use crate::renderer::{AttributeLayout, Graphics};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Clear(Vec4),
    CreateBuffer {
        buffer: usize,
        target: BufferTarget,
        data: Vec<u8>,
    },
    CreateProgram {
        program: usize,
    },
    UniformVec4 {
        name: &'static str,
        value: Vec4,
    },
    UniformMat4 {
        name: &'static str,
        value: Mat4,
    },
    VertexAttribute {
        buffer: usize,
        input: &'static str,
        layout: AttributeLayout,
    },
    DrawElements {
        index_buffer: usize,
        mode: DrawMode,
        count: i32,
        index_type: ComponentType,
        byte_offset: usize,
    },
    DrawArrays {
        mode: DrawMode,
        count: i32,
    },
}

impl Call {
    pub fn is_draw(&self) -> bool {
        matches!(self, Call::DrawElements { .. } | Call::DrawArrays { .. })
    }
}

pub struct RecordingGraphics {
    pub calls: Vec<Call>,
    /// Vertex inputs every program claims to declare; the location of an
    /// input is its position in this list.
    pub attributes: Vec<&'static str>,
    pub uniforms: Vec<&'static str>,
    /// Simulates the context refusing to create program objects.
    pub refuse_programs: bool,
    /// Number of clears so far, shareable with observers outside the renderer.
    pub clears: Rc<Cell<usize>>,
    next_object: usize,
}

impl Default for RecordingGraphics {
    fn default() -> Self {
        RecordingGraphics {
            calls: Vec::new(),
            attributes: vec!["a_position", "a_normal"],
            uniforms: vec!["matrix", "color"],
            refuse_programs: false,
            clears: Rc::default(),
            next_object: 1,
        }
    }
}

impl RecordingGraphics {
    pub fn draws(&self) -> Vec<&Call> {
        self.calls.iter().filter(|call| call.is_draw()).collect()
    }

    pub fn uploads(&self) -> Vec<(BufferTarget, &[u8])> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateBuffer { target, data, .. } => Some((*target, data.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn matrices(&self) -> Vec<Mat4> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::UniformMat4 { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    fn next_object(&mut self) -> usize {
        let object = self.next_object;
        self.next_object += 1;
        object
    }

    fn uniform_name(&self, location: Option<i32>) -> Option<&'static str> {
        self.uniforms.get(usize::try_from(location?).ok()?).copied()
    }
}

impl Graphics for RecordingGraphics {
    type Buffer = usize;
    type Program = usize;

    fn clear(&mut self, color: Vec4) {
        self.calls.push(Call::Clear(color));
        self.clears.set(self.clears.get() + 1);
    }

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> usize {
        let buffer = self.next_object();
        self.calls.push(Call::CreateBuffer {
            buffer,
            target,
            data: data.to_vec(),
        });
        buffer
    }

    fn create_program(&mut self, _vertex_source: &str, _fragment_source: &str) -> Option<usize> {
        if self.refuse_programs {
            return None;
        }
        let program = self.next_object();
        self.calls.push(Call::CreateProgram { program });
        Some(program)
    }

    fn attribute_location(&mut self, _program: &usize, name: &str) -> Option<u32> {
        let location = self.attributes.iter().position(|input| *input == name)?;
        Some(location as u32)
    }

    fn uniform_location(&mut self, _program: &usize, name: &str) -> Option<i32> {
        let location = self.uniforms.iter().position(|uniform| *uniform == name)?;
        Some(location as i32)
    }

    fn uniform_vec4(&mut self, location: Option<i32>, value: Vec4) {
        if let Some(name) = self.uniform_name(location) {
            self.calls.push(Call::UniformVec4 { name, value });
        }
    }

    fn uniform_mat4(&mut self, location: Option<i32>, value: &Mat4) {
        if let Some(name) = self.uniform_name(location) {
            self.calls.push(Call::UniformMat4 {
                name,
                value: *value,
            });
        }
    }

    fn vertex_attribute(&mut self, buffer: &usize, location: u32, layout: &AttributeLayout) {
        self.calls.push(Call::VertexAttribute {
            buffer: *buffer,
            input: self.attributes[location as usize],
            layout: *layout,
        });
    }

    fn draw_elements(
        &mut self,
        index_buffer: &usize,
        mode: DrawMode,
        count: i32,
        index_type: ComponentType,
        byte_offset: usize,
    ) {
        self.calls.push(Call::DrawElements {
            index_buffer: *index_buffer,
            mode,
            count,
            index_type,
            byte_offset,
        });
    }

    fn draw_arrays(&mut self, mode: DrawMode, count: i32) {
        self.calls.push(Call::DrawArrays { mode, count });
    }
}
