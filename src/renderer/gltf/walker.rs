use glam::Mat4;
use tracing::warn;

use crate::renderer::draw_calls::draw_primitive;
use crate::renderer::gltf::Gltf;
use crate::renderer::Graphics;


/// Model transforms of the nodes between the root and the node being
/// visited, root first.
#[derive(Debug, Clone)]
pub struct TransformStack {
    matrices: Vec<Mat4>,
}

impl TransformStack {
    pub fn new(root: Mat4) -> TransformStack {
        TransformStack {
            matrices: vec![root],
        }
    }

    pub fn root(&self) -> Mat4 {
        self.matrices[0]
    }

    pub fn root_mut(&mut self) -> &mut Mat4 {
        &mut self.matrices[0]
    }

    pub fn push(&mut self, transform: Mat4) {
        self.matrices.push(transform);
    }

    /// Never pops the root.
    pub fn pop(&mut self) -> Option<Mat4> {
        if self.matrices.len() > 1 {
            self.matrices.pop()
        } else {
            None
        }
    }

    /// Never less than one, the root.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// The product of every matrix on the stack, multiplied left to right.
    pub fn combined(&self) -> Mat4 {
        self.matrices
            .iter()
            .fold(Mat4::IDENTITY, |combined, matrix| combined * *matrix)
    }
}

/// Everything one scene pass touches.
pub struct FrameContext<'a, G: Graphics> {
    pub gfx: &'a mut G,
    pub gltf: &'a Gltf,
    pub transforms: &'a mut TransformStack,
}

/// Draws the document's active scene.
pub fn draw_scene<G: Graphics>(ctx: &mut FrameContext<'_, G>) {
    let gltf = ctx.gltf;
    draw_nodes(ctx, &gltf.scene().node_indices);
}

/// Depth-first, pre-order walk over `node_indices`. Nodes with a transform and
/// children push the transform for their subtree; other nodes with a mesh are
/// drawn with the stack as it is.
pub fn draw_nodes<G: Graphics>(ctx: &mut FrameContext<'_, G>, node_indices: &[usize]) {
    let gltf = ctx.gltf;
    for &node_index in node_indices {
        let node = &gltf.document.nodes[node_index];
        match node.transform {
            Some(transform) if !node.child_node_indices.is_empty() => {
                ctx.transforms.push(transform);
                // A node can carry both; its mesh sits under its own transform.
                if let Some(mesh_index) = node.mesh_index {
                    draw_mesh(ctx, mesh_index);
                }
                draw_nodes(ctx, &node.child_node_indices);
                ctx.transforms.pop();
            }
            _ => match node.mesh_index {
                Some(mesh_index) => draw_mesh(ctx, mesh_index),
                None => warn!("cannot draw node {node_index}: {node:?}"),
            },
        }
    }
}

fn draw_mesh<G: Graphics>(ctx: &mut FrameContext<'_, G>, mesh_index: usize) {
    let gltf = ctx.gltf;
    for primitive in &gltf.document.meshes[mesh_index].primitives {
        draw_primitive(ctx.gfx, gltf, primitive, ctx.transforms);
    }
}
