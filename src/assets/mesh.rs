use glam::Vec3;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;

        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// CPU-side geometry, before upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// 1×1×1 cube centred on the origin, four vertices per face so normals stay flat.
    pub fn unit_box() -> Self {
        // (normal, u, v) with u × v = normal, so faces wind counter-clockwise from outside.
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut mesh = Self { vertices: Vec::with_capacity(24), indices: Vec::with_capacity(36) };
        for (normal, u, v) in faces {
            mesh.push_quad(normal * 0.5, normal, u * 0.5, v * 0.5);
        }
        mesh
    }

    /// 1×1 square in the XY plane facing +Z.
    pub fn plane() -> Self {
        let mut mesh = Self { vertices: Vec::with_capacity(4), indices: Vec::with_capacity(6) };
        mesh.push_quad(Vec3::ZERO, Vec3::Z, Vec3::X * 0.5, Vec3::Y * 0.5);
        mesh
    }

    fn push_quad(&mut self, centre: Vec3, normal: Vec3, half_u: Vec3, half_v: Vec3) {
        let base = self.vertices.len() as u16;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (su, sv) in corners {
            self.vertices.push(Vertex {
                position: (centre + half_u * su + half_v * sv).into(),
                normal: normal.into(),
                tex_coords: [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5],
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

pub struct Mesh {
    pub vertex_buffer: Buffer,
    pub index_buffer: Buffer,
    pub num_indices: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, data: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: BufferUsages::VERTEX,
            }
        );
        let index_buffer = device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", label)),
                contents: bytemuck::cast_slice(&data.indices),
                usage: BufferUsages::INDEX,
            }
        );

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: data.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_normal(mesh: &MeshData, tri: &[u16]) -> Vec3 {
        let p = |i: u16| Vec3::from(mesh.vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0])).normalize()
    }

    #[test]
    fn unit_box_has_flat_faces() {
        let mesh = MeshData::unit_box();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);

        for vertex in &mesh.vertices {
            assert_relative_eq!(Vec3::from(vertex.normal).length(), 1.0);
            for c in vertex.position {
                assert_relative_eq!(c.abs(), 0.5);
            }
        }
    }

    #[test]
    fn triangles_wind_outwards() {
        for mesh in [MeshData::unit_box(), MeshData::plane()] {
            for tri in mesh.indices.chunks(3) {
                let expected = Vec3::from(mesh.vertices[tri[0] as usize].normal);
                assert_relative_eq!(triangle_normal(&mesh, tri).dot(expected), 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn plane_is_unit_square() {
        let mesh = MeshData::plane();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.position[2], 0.0);
            assert_relative_eq!(vertex.position[0].abs(), 0.5);
        }
    }
}
