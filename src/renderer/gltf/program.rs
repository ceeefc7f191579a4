use tracing::trace;

use crate::renderer::gltf::{AttributeKind, MaterialModel};
use crate::renderer::Graphics;

const VERTEX_SHADER: &str = r#"#version 300 es
in vec4 a_position;
in vec4 a_normal;
uniform mat4 matrix;
void main() {
    gl_Position = matrix * a_position;
}
"#;
const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec4 color;
out vec4 FRAG_COLOR;
void main() {
    FRAG_COLOR = color * vec4(gl_FragCoord.z, 1.0, 1.0, 1.0);
}
"#;

/// A linked, in-use program along with the input slots it was found to
/// declare.
pub struct MaterialProgram<P> {
    pub program: P,
    pub matrix_location: Option<i32>,
    /// Only the attribute kinds the shader actually consumes.
    slots: Vec<(AttributeKind, u32)>,
}

impl<P> MaterialProgram<P> {
    pub fn slot(&self, kind: AttributeKind) -> Option<u32> {
        self.slots
            .iter()
            .find(|(slot_kind, _)| *slot_kind == kind)
            .map(|&(_, location)| location)
    }
}

/// Builds the program for a material and seeds its color uniform. Only
/// metallic-roughness materials get one.
pub fn use_material<G: Graphics>(
    gfx: &mut G,
    material: &MaterialModel,
) -> Option<MaterialProgram<G::Program>> {
    let MaterialModel::MetallicRoughness { base_color_factor } = material else {
        trace!("no program for material {material:?}");
        return None;
    };
    let Some(program) = gfx.create_program(VERTEX_SHADER, FRAGMENT_SHADER) else {
        trace!("could not create the shader program");
        return None;
    };
    let slots = AttributeKind::ALL
        .into_iter()
        .filter_map(|kind| Some((kind, gfx.attribute_location(&program, kind.shader_input())?)))
        .collect();
    let matrix_location = gfx.uniform_location(&program, "matrix");
    let color_location = gfx.uniform_location(&program, "color");
    gfx.uniform_vec4(color_location, *base_color_factor);
    Some(MaterialProgram {
        program,
        matrix_location,
        slots,
    })
}
