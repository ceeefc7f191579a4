use thiserror::Error;

#[derive(Error, Debug)]
pub enum GltfError {
    #[error("[gltf] Unable to fetch \"{uri}\": {source}")]
    Fetch {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[gltf] Manifest is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("[gltf] Manifest is not valid JSON: {0}")]
    Json(String),

    #[error("[gltf] Missing field {0}")]
    MissingField(String),

    #[error("[gltf] Field {path} should be {expected}")]
    InvalidField { path: String, expected: &'static str },

    #[error("[gltf] Unknown {kind} {value}")]
    UnknownEnum { kind: &'static str, value: String },

    #[error("[gltf] {path} refers to index {index}, but there are only {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("[gltf] No scene at index {0}")]
    InvalidScene(usize),

    #[error("[gltf] Node {0} is its own ancestor")]
    CyclicNode(usize),

    #[error("[gltf] Unsupported buffer uri {0:?}")]
    UnsupportedUri(String),

    #[error("[gltf] Buffer {buffer} has {actual} bytes, expected at least {expected}")]
    BufferLength {
        buffer: usize,
        expected: usize,
        actual: usize,
    },

    #[error("[gltf] Buffer view {view} covers bytes {start}..{end} of buffer {buffer}, which has {len}")]
    BufferViewRange {
        view: usize,
        buffer: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("[gltf] Accessor {accessor} needs {needed} bytes of buffer view {view}, which has {len}")]
    AccessorRange {
        accessor: usize,
        view: usize,
        needed: usize,
        len: usize,
    },

    #[error("[gltf] Accessor {accessor} has {count} elements, more than a draw call can take")]
    AccessorCount { accessor: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, GltfError>;
