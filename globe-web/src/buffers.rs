/// GPU buffer upload for the sphere mesh
use globe_core::{GlobeError, Mesh};
use web_sys::{WebGl2RenderingContext as GL, WebGlBuffer};

/// Static buffers holding the globe mesh
#[derive(Debug, Clone)]
pub struct GlobeBuffers {
    pub position: WebGlBuffer,
    pub tex_coord: WebGlBuffer,
    pub indices: WebGlBuffer,
    pub index_count: i32,
}

impl GlobeBuffers {
    pub fn upload(gl: &GL, mesh: &Mesh) -> Result<Self, GlobeError> {
        let position = upload_array(
            gl,
            GL::ARRAY_BUFFER,
            "position",
            bytemuck::cast_slice(mesh.flat_positions()),
        )?;
        let tex_coord = upload_array(
            gl,
            GL::ARRAY_BUFFER,
            "texture coordinate",
            bytemuck::cast_slice(mesh.flat_tex_coords()),
        )?;
        let indices = upload_array(
            gl,
            GL::ELEMENT_ARRAY_BUFFER,
            "index",
            bytemuck::cast_slice(mesh.indices.as_slice()),
        )?;

        let index_count = i32::try_from(mesh.indices.len())
            .map_err(|_| GlobeError::BufferAllocation("index"))?;

        log::debug!(
            "uploaded globe buffers: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.indices.len()
        );

        Ok(Self {
            position,
            tex_coord,
            indices,
            index_count,
        })
    }
}

fn upload_array(
    gl: &GL,
    target: u32,
    name: &'static str,
    bytes: &[u8],
) -> Result<WebGlBuffer, GlobeError> {
    let buffer = gl
        .create_buffer()
        .ok_or(GlobeError::BufferAllocation(name))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, GL::STATIC_DRAW);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use globe_core::Mesh;

    #[test]
    fn test_byte_views_cover_mesh_arrays() {
        let mesh = Mesh::uv_sphere(1.0, 30, 30);
        let positions: &[u8] = bytemuck::cast_slice(mesh.flat_positions());
        let tex_coords: &[u8] = bytemuck::cast_slice(mesh.flat_tex_coords());
        let indices: &[u8] = bytemuck::cast_slice(mesh.indices.as_slice());

        assert_eq!(positions.len(), 31 * 31 * 3 * 4);
        assert_eq!(tex_coords.len(), 31 * 31 * 2 * 4);
        assert_eq!(indices.len(), 30 * 30 * 6 * 4);
    }

    #[test]
    fn test_byte_view_preserves_values() {
        let mesh = Mesh::uv_sphere(1.0, 1, 1);
        let indices: &[u8] = bytemuck::cast_slice(mesh.indices.as_slice());
        let second = u32::from_ne_bytes([indices[4], indices[5], indices[6], indices[7]]);
        assert_eq!(second, mesh.indices[1]);
    }
}
