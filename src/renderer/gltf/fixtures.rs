//! Small hand-written glTF documents for tests.

use crate::renderer::gltf::{parse_document, Gltf};

/// Three `VEC3` float positions followed by three `u16` indices and two bytes
/// of padding.
pub fn triangle_bin() -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let indices: [u16; 4] = [0, 1, 2, 0];
    let mut bin = bytemuck::cast_slice::<f32, u8>(&positions).to_vec();
    bin.extend_from_slice(&bytemuck::cast_slice::<u16, u8>(&indices)[..6]);
    bin.extend_from_slice(&[0, 0]);
    bin
}

/// The indexed triangle under any node graph. Mesh 0 is red
/// metallic-roughness, mesh 1 is the same triangle with a specular-glossiness
/// material.
pub fn triangle_json_with_nodes(scene_nodes: &str, nodes: &str) -> String {
    format!(
        r#"{{
    "asset": {{ "version": "2.0" }},
    "scene": 0,
    "scenes": [{{ "nodes": {scene_nodes} }}],
    "nodes": {nodes},
    "meshes": [
        {{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "material": 0 }}] }},
        {{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "material": 1 }}] }}
    ],
    "materials": [
        {{ "pbrMetallicRoughness": {{ "baseColorFactor": [1.0, 0.0, 0.0, 1.0] }} }},
        {{ "extensions": {{ "KHR_materials_pbrSpecularGlossiness": {{ "diffuseFactor": [0.0, 1.0, 0.0, 1.0] }} }} }}
    ],
    "accessors": [
        {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" }},
        {{ "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }}
    ],
    "bufferViews": [
        {{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }},
        {{ "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }}
    ],
    "buffers": [{{ "uri": "triangle.bin", "byteLength": 44 }}]
}}"#
    )
}

/// One scene with one root node drawing mesh 0.
pub fn triangle_json() -> String {
    triangle_json_with_nodes("[0]", r#"[{ "mesh": 0 }]"#)
}

pub fn triangle() -> Gltf {
    gltf(&triangle_json(), vec![triangle_bin()])
}

pub fn triangle_with_nodes(scene_nodes: &str, nodes: &str) -> Gltf {
    gltf(
        &triangle_json_with_nodes(scene_nodes, nodes),
        vec![triangle_bin()],
    )
}

/// Builds a document whose buffers are `len` bytes counting up from 0, so
/// every uploaded slice shows exactly where it was cut from.
pub fn with_counting_buffers(json: &str, lens: &[usize]) -> Gltf {
    let buffers = lens.iter().map(|&len| counting_bytes(0..len)).collect();
    gltf(json, buffers)
}

pub fn counting_bytes(range: std::ops::Range<usize>) -> Vec<u8> {
    range.map(|byte| byte as u8).collect()
}

pub fn gltf(json: &str, buffers: Vec<Vec<u8>>) -> Gltf {
    let document = parse_document(json).unwrap();
    Gltf::new(document, buffers).unwrap()
}
