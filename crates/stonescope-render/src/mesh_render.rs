//! Mesh GPU rendering resources.

use wgpu::util::DeviceExt;

use stonescope_core::geometry::{GeometryTarget, MeshData};

/// Interleaved vertex format for the stone pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Vertex normal.
    pub normal: [f32; 3],
    /// Texture coordinate (pre-tiling).
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Vertex buffer layout matching the stone shader inputs.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// GPU resources for one drawable mesh.
pub struct MeshRenderData {
    /// Interleaved vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices.
    pub num_indices: u32,
}

impl MeshRenderData {
    /// Uploads one mesh. Meshes missing UVs are uploaded with zeroed
    /// coordinates; the applicator normally synthesizes them first.
    pub fn new(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let uv_for = |i: usize| {
            mesh.uvs
                .as_ref()
                .and_then(|uvs| uvs.get(i))
                .map_or([0.0, 0.0], |uv| [uv.x, uv.y])
        };

        let vertices: Vec<MeshVertex> = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| MeshVertex {
                position: [p.x, p.y, p.z],
                normal: mesh
                    .normals
                    .get(i)
                    .map_or([0.0, 1.0, 0.0], |n| [n.x, n.y, n.z]),
                uv: uv_for(i),
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
        }
    }

    /// Uploads every mesh in a geometry graph, in traversal order.
    #[must_use]
    pub fn from_target(device: &wgpu::Device, target: &GeometryTarget) -> Vec<Self> {
        let mut out = Vec::new();
        target.for_each_mesh(|mesh| {
            out.push(Self::new(device, mesh));
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_vertex_size() {
        // 3 + 3 + 2 floats, tightly packed.
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn test_vertex_layout_stride_matches_struct() {
        let layout = MeshVertex::layout();
        assert_eq!(
            layout.array_stride,
            std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress
        );
        assert_eq!(layout.attributes.len(), 3);
    }
}
