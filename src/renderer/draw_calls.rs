use tracing::trace;

use crate::renderer::gltf::{use_material, BufferTarget, Gltf, Primitive, TransformStack};
use crate::renderer::{AttributeLayout, Graphics};

#[cfg(test)]
mod tests;

/// Uploads one primitive's vertex and index data, binds it to a freshly built
/// program and issues its draw call. Every GPU object created here is
/// released when the function returns.
pub fn draw_primitive<G: Graphics>(
    gfx: &mut G,
    gltf: &Gltf,
    primitive: &Primitive,
    transforms: &TransformStack,
) {
    let material = gltf.material(primitive.material_index);
    let Some(program) = use_material(gfx, &material.model) else {
        return;
    };

    let document = &gltf.document;
    let mut uploads = Vec::with_capacity(primitive.attributes.len());
    let mut count = 0;
    for &(kind, accessor_index) in &primitive.attributes {
        let accessor = &document.accessors[accessor_index];
        let view = &document.buffer_views[accessor.buffer_view];
        let buffer = gfx.create_buffer(
            view.target.unwrap_or(BufferTarget::Vertex),
            gltf.view_bytes(view),
        );
        let Some(location) = program.slot(kind) else {
            trace!("shader has no input for {}", kind.semantic());
            uploads.push(buffer);
            continue;
        };
        let components = accessor.type_.channels();
        if components == 0 {
            trace!("cannot bind {:?} accessor as {}", accessor.type_, kind.semantic());
            uploads.push(buffer);
            continue;
        }
        // The buffer holds just the view, so offsets are relative to its start.
        let layout = AttributeLayout {
            components,
            component_type: accessor.component_type,
            normalized: accessor.normalized,
            stride: view.byte_stride.unwrap_or(0) as i32,
            byte_offset: accessor.byte_offset,
        };
        gfx.vertex_attribute(&buffer, location, &layout);
        uploads.push(buffer);
        count = count.max(accessor.count);
    }

    let index_buffer = primitive.indices.map(|accessor_index| {
        let accessor = &document.accessors[accessor_index];
        let view = &document.buffer_views[accessor.buffer_view];
        let buffer = gfx.create_buffer(
            view.target.unwrap_or(BufferTarget::Index),
            gltf.view_bytes(view),
        );
        (buffer, accessor)
    });

    let draw_count = match &index_buffer {
        Some((_, accessor)) => accessor.count,
        None => count,
    };
    let Ok(draw_count) = i32::try_from(draw_count) else {
        trace!("cannot draw {draw_count} elements in one call");
        return;
    };

    gfx.uniform_mat4(program.matrix_location, &transforms.combined());
    match &index_buffer {
        Some((buffer, accessor)) => gfx.draw_elements(
            buffer,
            primitive.mode,
            draw_count,
            accessor.component_type,
            accessor.byte_offset,
        ),
        None => gfx.draw_arrays(primitive.mode, draw_count),
    }
}
