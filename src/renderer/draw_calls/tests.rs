use glam::{Mat4, Vec4};

use super::draw_primitive;
use crate::renderer::gltf::fixtures::{counting_bytes, triangle, triangle_bin, with_counting_buffers};
use crate::renderer::gltf::{BufferTarget, ComponentType, DrawMode, Gltf, TransformStack};
use crate::renderer::recording::{Call, RecordingGraphics};
use crate::renderer::AttributeLayout;

fn draw_mesh(gltf: &Gltf, mesh: usize, gfx: &mut RecordingGraphics) {
    let transforms = TransformStack::new(Mat4::IDENTITY);
    for primitive in &gltf.document.meshes[mesh].primitives {
        draw_primitive(gfx, gltf, primitive, &transforms);
    }
}

#[test]
fn indexed_primitive() {
    let gltf = triangle();
    let mut gfx = RecordingGraphics::default();
    draw_mesh(&gltf, 0, &mut gfx);

    let bin = triangle_bin();
    assert_eq!(
        gfx.calls,
        vec![
            Call::CreateProgram { program: 1 },
            Call::UniformVec4 {
                name: "color",
                value: Vec4::new(1.0, 0.0, 0.0, 1.0),
            },
            Call::CreateBuffer {
                buffer: 2,
                target: BufferTarget::Vertex,
                data: bin[..36].to_vec(),
            },
            Call::VertexAttribute {
                buffer: 2,
                input: "a_position",
                layout: AttributeLayout {
                    components: 3,
                    component_type: ComponentType::Float,
                    normalized: false,
                    stride: 0,
                    byte_offset: 0,
                },
            },
            Call::CreateBuffer {
                buffer: 3,
                target: BufferTarget::Index,
                data: bin[36..42].to_vec(),
            },
            Call::UniformMat4 {
                name: "matrix",
                value: Mat4::IDENTITY,
            },
            Call::DrawElements {
                index_buffer: 3,
                mode: DrawMode::Triangles,
                count: 3,
                index_type: ComponentType::UnsignedShort,
                byte_offset: 0,
            },
        ]
    );
}

#[test]
fn other_materials_draw_nothing() {
    let gltf = triangle();
    let mut gfx = RecordingGraphics::default();
    draw_mesh(&gltf, 1, &mut gfx);
    assert!(gfx.calls.is_empty());
}

#[test]
fn refused_program_skips_the_primitive() {
    let gltf = triangle();
    let mut gfx = RecordingGraphics::default();
    gfx.refuse_programs = true;
    draw_mesh(&gltf, 0, &mut gfx);
    assert!(gfx.draws().is_empty());
    assert!(gfx.uploads().is_empty());
}

#[test]
fn oversized_count_skips_the_draw() {
    let mut gltf = triangle();
    let indices = gltf.document.meshes[0].primitives[0].indices.unwrap();
    gltf.document.accessors[indices].count = i32::MAX as usize + 1;
    let mut gfx = RecordingGraphics::default();
    draw_mesh(&gltf, 0, &mut gfx);
    assert!(gfx.draws().is_empty());
}

#[test]
fn overlapping_views_upload_only_their_own_bytes() {
    let json = r#"{
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0, "NORMAL": 1 }, "indices": 2 }] }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 1, "byteOffset": 4, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 16, "byteLength": 28 },
            { "buffer": 1, "byteOffset": 2, "byteLength": 6 }
        ],
        "buffers": [
            { "uri": "a.bin", "byteLength": 48 },
            { "uri": "b.bin", "byteLength": 10 }
        ]
    }"#;
    let gltf = with_counting_buffers(json, &[48, 10]);
    let mut gfx = RecordingGraphics::default();
    draw_mesh(&gltf, 0, &mut gfx);

    let positions = counting_bytes(8..32);
    let normals = counting_bytes(16..44);
    let indices = counting_bytes(2..8);
    assert_eq!(
        gfx.uploads(),
        vec![
            (BufferTarget::Vertex, positions.as_slice()),
            (BufferTarget::Vertex, normals.as_slice()),
            (BufferTarget::Index, indices.as_slice()),
        ]
    );

    let offsets: Vec<_> = gfx
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::VertexAttribute { input, layout, .. } => Some((*input, layout.byte_offset)),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, vec![("a_position", 0), ("a_normal", 4)]);

    // Primitive without a material uses white.
    assert!(gfx.calls.contains(&Call::UniformVec4 {
        name: "color",
        value: Vec4::ONE
    }));
}

#[test]
fn non_indexed_draw_uses_the_largest_bound_count() {
    let json = r#"{
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": [{
            "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 },
            "mode": 1
        }] }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 1, "componentType": 5126, "count": 4, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 6, "type": "VEC2" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 48 },
            { "buffer": 0, "byteOffset": 84, "byteLength": 48 }
        ],
        "buffers": [{ "uri": "lines.bin", "byteLength": 132 }]
    }"#;
    let gltf = with_counting_buffers(json, &[132]);
    let mut gfx = RecordingGraphics::default();
    draw_mesh(&gltf, 0, &mut gfx);

    // The shader has no a_texcoord_0: uploaded, never bound, not counted.
    assert_eq!(gfx.uploads().len(), 3);
    let bound: Vec<_> = gfx
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::VertexAttribute { input, .. } => Some(*input),
            _ => None,
        })
        .collect();
    assert_eq!(bound, vec!["a_position", "a_normal"]);
    assert_eq!(
        gfx.draws(),
        vec![&Call::DrawArrays {
            mode: DrawMode::Lines,
            count: 4
        }]
    );
}

#[test]
fn interleaved_attributes_keep_their_stride() {
    let json = r#"{
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0, "NORMAL": 1 } }] }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 0, "byteOffset": 12, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "bufferViews": [{ "buffer": 0, "byteLength": 48, "byteStride": 24, "target": 34962 }],
        "buffers": [{ "uri": "interleaved.bin", "byteLength": 48 }]
    }"#;
    let gltf = with_counting_buffers(json, &[48]);
    let mut gfx = RecordingGraphics::default();
    draw_mesh(&gltf, 0, &mut gfx);

    let layouts: Vec<_> = gfx
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::VertexAttribute { layout, .. } => Some((layout.stride, layout.byte_offset)),
            _ => None,
        })
        .collect();
    assert_eq!(layouts, vec![(24, 0), (24, 12)]);
    // The same view is uploaded once per attribute.
    assert_eq!(gfx.uploads().len(), 2);
    assert_eq!(
        gfx.draws(),
        vec![&Call::DrawArrays {
            mode: DrawMode::Triangles,
            count: 2
        }]
    );
}

#[test]
fn matrix_accessors_are_not_bound() {
    let json = r#"{
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "mode": 0 }] }],
        "accessors": [{ "bufferView": 0, "componentType": 5126, "count": 1, "type": "MAT4" }],
        "bufferViews": [{ "buffer": 0, "byteLength": 64 }],
        "buffers": [{ "uri": "m.bin", "byteLength": 64 }]
    }"#;
    let gltf = with_counting_buffers(json, &[64]);
    let mut gfx = RecordingGraphics::default();
    draw_mesh(&gltf, 0, &mut gfx);

    assert!(!gfx
        .calls
        .iter()
        .any(|call| matches!(call, Call::VertexAttribute { .. })));
    assert_eq!(
        gfx.draws(),
        vec![&Call::DrawArrays {
            mode: DrawMode::Points,
            count: 0
        }]
    );
}
