use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use futures::future::try_join_all;
use glam::{Mat4, Quat, Vec3, Vec4};
use tinyjson::JsonValue;
use tracing::{debug, info};

use crate::renderer::gltf::{
    Accessor, AccessorType, AttributeKind, BufferDesc, BufferTarget, BufferView, ComponentType,
    Document, DrawMode, Gltf, GltfError, Material, MaterialModel, Mesh, Node, Primitive, Result,
    Scene,
};


/// Source of manifest and buffer bytes.
pub trait Fetch {
    fn fetch(&self, uri: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

/// Reads resources from a directory on the local (or emscripten virtual)
/// filesystem.
#[derive(Debug, Clone)]
pub struct FileFetch {
    root: PathBuf,
}

impl FileFetch {
    pub fn new(root: impl Into<PathBuf>) -> FileFetch {
        FileFetch { root: root.into() }
    }
}

impl Fetch for FileFetch {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root.join(uri.trim_start_matches('/'));
        std::fs::read(&path).map_err(|source| GltfError::Fetch {
            uri: uri.to_owned(),
            source,
        })
    }
}

/// Fetches and parses the manifest, then fetches all of its buffers at once.
/// The first failure aborts the whole load.
pub async fn load<F: Fetch>(fetcher: &F, manifest_uri: &str) -> Result<Gltf> {
    let manifest = fetcher.fetch(manifest_uri).await?;
    let document = parse_document(std::str::from_utf8(&manifest)?)?;
    info!(
        "parsed {manifest_uri}: {} nodes, {} meshes, {} buffers",
        document.nodes.len(),
        document.meshes.len(),
        document.buffers.len(),
    );

    let base = base_path(manifest_uri);
    let uris = document
        .buffers
        .iter()
        .map(|buffer| resolve_uri(base, buffer.uri.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    let buffers = try_join_all(uris.iter().map(|uri| fetcher.fetch(uri))).await?;
    info!("fetched {} buffers", buffers.len());

    Gltf::new(document, buffers)
}

/// Everything up to and including the last path separator.
fn base_path(uri: &str) -> &str {
    match uri.rfind(['/', '\\']) {
        Some(index) => &uri[..=index],
        None => "",
    }
}

fn resolve_uri(base: &str, uri: Option<&str>) -> Result<String> {
    match uri {
        Some(uri) if !uri.starts_with("data:") && !uri.contains("://") => {
            Ok(format!("{base}{uri}"))
        }
        uri => Err(GltfError::UnsupportedUri(uri.unwrap_or_default().to_owned())),
    }
}

/// Parses a glTF JSON manifest and checks its internal references.
pub fn parse_document(text: &str) -> Result<Document> {
    let json: JsonValue = text
        .parse()
        .map_err(|err: tinyjson::JsonParseError| GltfError::Json(err.to_string()))?;
    let root = Fields::new(&json, String::new())?;

    let scene = root.usize_or("scene", 0)?;
    let scenes = root
        .required_objects("scenes")?
        .iter()
        .map(|scene| {
            Ok(Scene {
                node_indices: scene.indices("nodes")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let nodes = root
        .objects("nodes")?
        .iter()
        .map(parse_node)
        .collect::<Result<Vec<_>>>()?;
    let meshes = root
        .objects("meshes")?
        .iter()
        .map(parse_mesh)
        .collect::<Result<Vec<_>>>()?;
    let materials = root
        .objects("materials")?
        .iter()
        .map(parse_material)
        .collect::<Result<Vec<_>>>()?;
    let accessors = root
        .objects("accessors")?
        .iter()
        .map(parse_accessor)
        .collect::<Result<Vec<_>>>()?;
    let buffer_views = root
        .objects("bufferViews")?
        .iter()
        .map(parse_buffer_view)
        .collect::<Result<Vec<_>>>()?;
    let buffers = root
        .objects("buffers")?
        .iter()
        .map(|buffer| {
            Ok(BufferDesc {
                uri: buffer.optional_string("uri")?.map(str::to_owned),
                byte_length: buffer.usize("byteLength")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let document = Document {
        scene,
        scenes,
        nodes,
        meshes,
        materials,
        accessors,
        buffer_views,
        buffers,
    };
    validate(&document)?;
    Ok(document)
}

fn parse_node(node: &Fields) -> Result<Node> {
    let transform = match node.floats::<16>("matrix")? {
        Some(matrix) => Some(Mat4::from_cols_array(&matrix)),
        None => {
            let translation = node.floats::<3>("translation")?;
            let rotation = node.floats::<4>("rotation")?;
            let scale = node.floats::<3>("scale")?;
            (translation.is_some() || rotation.is_some() || scale.is_some()).then(|| {
                Mat4::from_scale_rotation_translation(
                    scale.map_or(Vec3::ONE, Vec3::from_array),
                    rotation.map_or(Quat::IDENTITY, Quat::from_array),
                    translation.map_or(Vec3::ZERO, Vec3::from_array),
                )
            })
        }
    };
    Ok(Node {
        mesh_index: node.optional_usize("mesh")?,
        child_node_indices: node.indices("children")?,
        transform,
    })
}

fn parse_mesh(mesh: &Fields) -> Result<Mesh> {
    let primitives = mesh
        .required_objects("primitives")?
        .iter()
        .map(|primitive| {
            let attribute_accessors = primitive.object("attributes")?;
            let mut attributes = Vec::with_capacity(attribute_accessors.object.len());
            for (semantic, accessor) in attribute_accessors.object {
                let accessor = as_usize(accessor, attribute_accessors.field_path(semantic))?;
                match AttributeKind::from_semantic(semantic) {
                    Some(kind) => attributes.push((kind, accessor)),
                    None => debug!("ignoring unsupported attribute semantic \"{semantic}\""),
                }
            }
            attributes.sort_by_key(|&(kind, _)| kind);

            let mode = primitive.usize_or("mode", 4)?;
            let mode = DrawMode::from_gl(mode as u32).ok_or_else(|| GltfError::UnknownEnum {
                kind: "primitive mode",
                value: mode.to_string(),
            })?;
            Ok(Primitive {
                attributes,
                indices: primitive.optional_usize("indices")?,
                material_index: primitive.optional_usize("material")?,
                mode,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Mesh { primitives })
}

fn parse_material(material: &Fields) -> Result<Material> {
    let model = match material.optional_object("pbrMetallicRoughness")? {
        Some(pbr) => MaterialModel::MetallicRoughness {
            base_color_factor: pbr
                .floats::<4>("baseColorFactor")?
                .map_or(Vec4::ONE, Vec4::from_array),
        },
        None => MaterialModel::Other,
    };
    Ok(Material { model })
}

fn parse_accessor(accessor: &Fields) -> Result<Accessor> {
    let component_type = accessor.usize("componentType")?;
    let component_type =
        ComponentType::from_gl(component_type as u32).ok_or_else(|| GltfError::UnknownEnum {
            kind: "component type",
            value: component_type.to_string(),
        })?;
    let type_ = accessor.string("type")?;
    let type_ = AccessorType::from_tag(type_).ok_or_else(|| GltfError::UnknownEnum {
        kind: "accessor type",
        value: type_.to_owned(),
    })?;
    Ok(Accessor {
        buffer_view: accessor.usize("bufferView")?,
        byte_offset: accessor.usize_or("byteOffset", 0)?,
        component_type,
        normalized: accessor.bool_or("normalized", false)?,
        count: accessor.usize("count")?,
        type_,
    })
}

fn parse_buffer_view(view: &Fields) -> Result<BufferView> {
    let target = match view.optional_usize("target")? {
        Some(target) => Some(BufferTarget::from_gl(target as u32).ok_or_else(|| {
            GltfError::UnknownEnum {
                kind: "buffer view target",
                value: target.to_string(),
            }
        })?),
        None => None,
    };
    Ok(BufferView {
        buffer: view.usize("buffer")?,
        byte_offset: view.usize_or("byteOffset", 0)?,
        byte_length: view.usize("byteLength")?,
        byte_stride: view.optional_usize("byteStride")?,
        target,
    })
}

fn validate(document: &Document) -> Result<()> {
    if document.scene >= document.scenes.len() {
        return Err(GltfError::InvalidScene(document.scene));
    }
    for (i, scene) in document.scenes.iter().enumerate() {
        for &node in &scene.node_indices {
            check_index(|| format!("scenes[{i}].nodes"), node, document.nodes.len())?;
        }
    }
    for (i, node) in document.nodes.iter().enumerate() {
        for &child in &node.child_node_indices {
            check_index(|| format!("nodes[{i}].children"), child, document.nodes.len())?;
        }
        if let Some(mesh) = node.mesh_index {
            check_index(|| format!("nodes[{i}].mesh"), mesh, document.meshes.len())?;
        }
    }
    for (i, mesh) in document.meshes.iter().enumerate() {
        for (j, primitive) in mesh.primitives.iter().enumerate() {
            let path = || format!("meshes[{i}].primitives[{j}]");
            let accessors = document.accessors.len();
            for &(kind, accessor) in &primitive.attributes {
                check_index(
                    || format!("{}.attributes.{}", path(), kind.semantic()),
                    accessor,
                    accessors,
                )?;
            }
            if let Some(indices) = primitive.indices {
                check_index(|| format!("{}.indices", path()), indices, accessors)?;
            }
            if let Some(material) = primitive.material_index {
                check_index(
                    || format!("{}.material", path()),
                    material,
                    document.materials.len(),
                )?;
            }
        }
    }
    for (i, accessor) in document.accessors.iter().enumerate() {
        check_index(
            || format!("accessors[{i}].bufferView"),
            accessor.buffer_view,
            document.buffer_views.len(),
        )?;
    }
    for (i, view) in document.buffer_views.iter().enumerate() {
        check_index(
            || format!("bufferViews[{i}].buffer"),
            view.buffer,
            document.buffers.len(),
        )?;
    }
    check_acyclic(&document.nodes)
}

fn check_index(path: impl FnOnce() -> String, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(GltfError::IndexOutOfRange {
            path: path(),
            index,
            len,
        })
    }
}

/// Depth-first search over every node; reaching a node that is still on the
/// current path means the children lists form a cycle.
fn check_acyclic(nodes: &[Node]) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut path: Vec<(usize, usize)> = Vec::new();
    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::OnPath;
        path.push((start, 0));
        while let Some(&(node, next_child)) = path.last() {
            match nodes[node].child_node_indices.get(next_child) {
                Some(&child) => {
                    let top = path.len() - 1;
                    path[top].1 += 1;
                    match marks[child] {
                        Mark::OnPath => return Err(GltfError::CyclicNode(child)),
                        Mark::Unvisited => {
                            marks[child] = Mark::OnPath;
                            path.push((child, 0));
                        }
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    path.pop();
                }
            }
        }
    }
    Ok(())
}

/// Typed access to the fields of one JSON object, remembering where in the
/// document it sits for error messages.
struct Fields<'a> {
    object: &'a HashMap<String, JsonValue>,
    path: String,
}

impl<'a> Fields<'a> {
    fn new(value: &'a JsonValue, path: String) -> Result<Fields<'a>> {
        match value.get::<HashMap<String, JsonValue>>() {
            Some(object) => Ok(Fields { object, path }),
            None => Err(GltfError::InvalidField {
                path,
                expected: "an object",
            }),
        }
    }

    fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn required(&self, key: &str) -> Result<&'a JsonValue> {
        self.object
            .get(key)
            .ok_or_else(|| GltfError::MissingField(self.field_path(key)))
    }

    fn usize(&self, key: &str) -> Result<usize> {
        as_usize(self.required(key)?, self.field_path(key))
    }

    fn optional_usize(&self, key: &str) -> Result<Option<usize>> {
        self.object
            .get(key)
            .map(|value| as_usize(value, self.field_path(key)))
            .transpose()
    }

    fn usize_or(&self, key: &str, default: usize) -> Result<usize> {
        Ok(self.optional_usize(key)?.unwrap_or(default))
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.object.get(key) {
            Some(value) => value.get::<bool>().copied().ok_or_else(|| GltfError::InvalidField {
                path: self.field_path(key),
                expected: "a boolean",
            }),
            None => Ok(default),
        }
    }

    fn string(&self, key: &str) -> Result<&'a str> {
        self.optional_string(key)?
            .ok_or_else(|| GltfError::MissingField(self.field_path(key)))
    }

    fn optional_string(&self, key: &str) -> Result<Option<&'a str>> {
        match self.object.get(key) {
            Some(value) => match value.get::<String>() {
                Some(string) => Ok(Some(string.as_str())),
                None => Err(GltfError::InvalidField {
                    path: self.field_path(key),
                    expected: "a string",
                }),
            },
            None => Ok(None),
        }
    }

    fn array(&self, key: &str) -> Result<Option<&'a [JsonValue]>> {
        match self.object.get(key) {
            Some(value) => match value.get::<Vec<JsonValue>>() {
                Some(values) => Ok(Some(values.as_slice())),
                None => Err(GltfError::InvalidField {
                    path: self.field_path(key),
                    expected: "an array",
                }),
            },
            None => Ok(None),
        }
    }

    /// Array of indices; empty if the field is missing.
    fn indices(&self, key: &str) -> Result<Vec<usize>> {
        let path = self.field_path(key);
        self.array(key)?
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, value)| as_usize(value, format!("{path}[{i}]")))
            .collect()
    }

    /// Array of exactly `N` numbers, if the field is present.
    fn floats<const N: usize>(&self, key: &str) -> Result<Option<[f32; N]>> {
        let Some(values) = self.array(key)? else {
            return Ok(None);
        };
        let invalid = || GltfError::InvalidField {
            path: self.field_path(key),
            expected: "an array of numbers of the right length",
        };
        if values.len() != N {
            return Err(invalid());
        }
        let mut floats = [0.0; N];
        for (float, value) in floats.iter_mut().zip(values) {
            *float = *value.get::<f64>().ok_or_else(invalid)? as f32;
        }
        Ok(Some(floats))
    }

    fn object(&self, key: &str) -> Result<Fields<'a>> {
        Fields::new(self.required(key)?, self.field_path(key))
    }

    fn optional_object(&self, key: &str) -> Result<Option<Fields<'a>>> {
        self.object
            .get(key)
            .map(|value| Fields::new(value, self.field_path(key)))
            .transpose()
    }

    /// Array of objects; empty if the field is missing.
    fn objects(&self, key: &str) -> Result<Vec<Fields<'a>>> {
        let path = self.field_path(key);
        self.array(key)?
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, value)| Fields::new(value, format!("{path}[{i}]")))
            .collect()
    }

    fn required_objects(&self, key: &str) -> Result<Vec<Fields<'a>>> {
        self.required(key)?;
        self.objects(key)
    }
}

fn as_usize(value: &JsonValue, path: String) -> Result<usize> {
    match value.get::<f64>() {
        Some(&number) if number >= 0.0 && number.fract() == 0.0 => Ok(number as usize),
        _ => Err(GltfError::InvalidField {
            path,
            expected: "a non-negative integer",
        }),
    }
}
