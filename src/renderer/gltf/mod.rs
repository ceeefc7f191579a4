use glam::{Mat4, Vec4};

mod error;
mod loader;
mod program;
mod walker;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{GltfError, Result};
pub use loader::{load, parse_document, Fetch, FileFetch};
pub use program::{use_material, MaterialProgram};
pub use walker::{draw_nodes, draw_scene, FrameContext, TransformStack};

/// A parsed glTF manifest. Every index stored in it has been checked against
/// the array it points into, and the node graph is known to be acyclic.
#[derive(Debug, Clone)]
pub struct Document {
    pub scene: usize,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<BufferDesc>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub node_indices: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub mesh_index: Option<usize>,
    pub child_node_indices: Vec<usize>,
    /// `None` when the node declares neither a matrix nor any of
    /// translation/rotation/scale.
    pub transform: Option<Mat4>,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone)]
pub struct Primitive {
    /// Sorted by attribute kind, so every traversal binds in the same order.
    pub attributes: Vec<(AttributeKind, usize)>,
    pub indices: Option<usize>,
    pub material_index: Option<usize>,
    pub mode: DrawMode,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub model: MaterialModel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialModel {
    MetallicRoughness { base_color_factor: Vec4 },
    /// Anything without `pbrMetallicRoughness`. Never drawn.
    Other,
}

impl Material {
    /// What primitives without a `material` are drawn with.
    pub const DEFAULT: Material = Material {
        model: MaterialModel::MetallicRoughness {
            base_color_factor: Vec4::ONE,
        },
    };
}

#[derive(Debug, Clone)]
pub struct Accessor {
    pub buffer_view: usize,
    pub byte_offset: usize,
    pub component_type: ComponentType,
    pub normalized: bool,
    pub count: usize,
    pub type_: AccessorType,
}

impl Accessor {
    pub fn element_size(&self) -> usize {
        self.type_.components() * self.component_type.byte_size()
    }
}

#[derive(Debug, Clone)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
    pub target: Option<BufferTarget>,
}

#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// `None` for the binary chunk of a GLB, which this viewer can't read.
    pub uri: Option<String>,
    pub byte_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    pub fn from_tag(tag: &str) -> Option<AccessorType> {
        match tag {
            "SCALAR" => Some(AccessorType::Scalar),
            "VEC2" => Some(AccessorType::Vec2),
            "VEC3" => Some(AccessorType::Vec3),
            "VEC4" => Some(AccessorType::Vec4),
            "MAT2" => Some(AccessorType::Mat2),
            "MAT3" => Some(AccessorType::Mat3),
            "MAT4" => Some(AccessorType::Mat4),
            _ => None,
        }
    }

    /// Component count of a vertex attribute of this type. Matrices can't be
    /// bound as a single attribute and get 0.
    pub fn channels(self) -> i32 {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec2 => 2,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 => 4,
            AccessorType::Mat2 | AccessorType::Mat3 | AccessorType::Mat4 => 0,
        }
    }

    /// Number of components stored per element.
    pub fn components(self) -> usize {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec2 => 2,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 | AccessorType::Mat2 => 4,
            AccessorType::Mat3 => 9,
            AccessorType::Mat4 => 16,
        }
    }
}

/// Attribute component count for an accessor type tag, 0 for anything that
/// isn't `SCALAR` or `VEC2`..`VEC4`.
pub fn channels(tag: &str) -> i32 {
    AccessorType::from_tag(tag).map_or(0, AccessorType::channels)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    pub fn from_gl(value: u32) -> Option<ComponentType> {
        match value {
            5120 => Some(ComponentType::Byte),
            5121 => Some(ComponentType::UnsignedByte),
            5122 => Some(ComponentType::Short),
            5123 => Some(ComponentType::UnsignedShort),
            5125 => Some(ComponentType::UnsignedInt),
            5126 => Some(ComponentType::Float),
            _ => None,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            ComponentType::Byte => 5120,
            ComponentType::UnsignedByte => 5121,
            ComponentType::Short => 5122,
            ComponentType::UnsignedShort => 5123,
            ComponentType::UnsignedInt => 5125,
            ComponentType::Float => 5126,
        }
    }

    pub fn byte_size(self) -> usize {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    pub fn from_gl(value: u32) -> Option<DrawMode> {
        match value {
            0 => Some(DrawMode::Points),
            1 => Some(DrawMode::Lines),
            2 => Some(DrawMode::LineLoop),
            3 => Some(DrawMode::LineStrip),
            4 => Some(DrawMode::Triangles),
            5 => Some(DrawMode::TriangleStrip),
            6 => Some(DrawMode::TriangleFan),
            _ => None,
        }
    }

    pub fn gl_enum(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

impl BufferTarget {
    pub fn from_gl(value: u32) -> Option<BufferTarget> {
        match value {
            34962 => Some(BufferTarget::Vertex),
            34963 => Some(BufferTarget::Index),
            _ => None,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Vertex => 34962,
            BufferTarget::Index => 34963,
        }
    }
}

/// The vertex attribute semantics the viewer knows how to route to a shader
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKind {
    Position,
    Normal,
    Tangent,
    TexCoord0,
    TexCoord1,
    Color0,
    Joints0,
    Weights0,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 8] = [
        AttributeKind::Position,
        AttributeKind::Normal,
        AttributeKind::Tangent,
        AttributeKind::TexCoord0,
        AttributeKind::TexCoord1,
        AttributeKind::Color0,
        AttributeKind::Joints0,
        AttributeKind::Weights0,
    ];

    pub fn from_semantic(semantic: &str) -> Option<AttributeKind> {
        AttributeKind::ALL
            .into_iter()
            .find(|kind| kind.semantic() == semantic)
    }

    pub fn semantic(self) -> &'static str {
        match self {
            AttributeKind::Position => "POSITION",
            AttributeKind::Normal => "NORMAL",
            AttributeKind::Tangent => "TANGENT",
            AttributeKind::TexCoord0 => "TEXCOORD_0",
            AttributeKind::TexCoord1 => "TEXCOORD_1",
            AttributeKind::Color0 => "COLOR_0",
            AttributeKind::Joints0 => "JOINTS_0",
            AttributeKind::Weights0 => "WEIGHTS_0",
        }
    }

    /// Name of the vertex shader input this attribute feeds: `a_` followed by
    /// the lowercased semantic.
    pub fn shader_input(self) -> &'static str {
        match self {
            AttributeKind::Position => "a_position",
            AttributeKind::Normal => "a_normal",
            AttributeKind::Tangent => "a_tangent",
            AttributeKind::TexCoord0 => "a_texcoord_0",
            AttributeKind::TexCoord1 => "a_texcoord_1",
            AttributeKind::Color0 => "a_color_0",
            AttributeKind::Joints0 => "a_joints_0",
            AttributeKind::Weights0 => "a_weights_0",
        }
    }
}

/// A document together with the contents of every buffer it references,
/// aligned by buffer index.
#[derive(Debug, Clone)]
pub struct Gltf {
    pub document: Document,
    pub buffers: Vec<Vec<u8>>,
}

impl Gltf {
    /// Pairs the document with its buffers, checking that every buffer view
    /// and accessor fits inside the data it describes.
    pub fn new(document: Document, buffers: Vec<Vec<u8>>) -> Result<Gltf> {
        if buffers.len() != document.buffers.len() {
            return Err(GltfError::IndexOutOfRange {
                path: "buffers".to_owned(),
                index: document.buffers.len(),
                len: buffers.len(),
            });
        }
        for (buffer, (desc, data)) in document.buffers.iter().zip(&buffers).enumerate() {
            if data.len() < desc.byte_length {
                return Err(GltfError::BufferLength {
                    buffer,
                    expected: desc.byte_length,
                    actual: data.len(),
                });
            }
        }
        for (view, buffer_view) in document.buffer_views.iter().enumerate() {
            let len = document.buffers[buffer_view.buffer].byte_length;
            let end = buffer_view
                .byte_offset
                .saturating_add(buffer_view.byte_length);
            if end > len {
                return Err(GltfError::BufferViewRange {
                    view,
                    buffer: buffer_view.buffer,
                    start: buffer_view.byte_offset,
                    end,
                    len,
                });
            }
        }
        for (index, accessor) in document.accessors.iter().enumerate() {
            if i32::try_from(accessor.count).is_err() {
                return Err(GltfError::AccessorCount {
                    accessor: index,
                    count: accessor.count,
                });
            }
            let view = &document.buffer_views[accessor.buffer_view];
            let element_size = accessor.element_size();
            let stride = view.byte_stride.unwrap_or(element_size);
            let needed = match accessor.count {
                0 => 0,
                count => stride
                    .saturating_mul(count - 1)
                    .saturating_add(accessor.byte_offset)
                    .saturating_add(element_size),
            };
            if needed > view.byte_length {
                return Err(GltfError::AccessorRange {
                    accessor: index,
                    view: accessor.buffer_view,
                    needed,
                    len: view.byte_length,
                });
            }
        }
        Ok(Gltf { document, buffers })
    }

    pub fn scene(&self) -> &Scene {
        &self.document.scenes[self.document.scene]
    }

    pub fn material(&self, index: Option<usize>) -> &Material {
        match index {
            Some(index) => &self.document.materials[index],
            None => &Material::DEFAULT,
        }
    }

    /// The bytes the buffer view declares, and nothing around them.
    pub fn view_bytes(&self, view: &BufferView) -> &[u8] {
        &self.buffers[view.buffer][view.byte_offset..view.byte_offset + view.byte_length]
    }
}
