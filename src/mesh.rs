//! Sphere geometry and GPU mesh buffers.
//!
//! - [`Vertex3d`]: the vertex format, containing position, normal and UV data
//! - [`SphereGeometry`]: CPU-side inverted UV sphere the panorama is painted on
//! - [`Mesh`]: GPU-resident geometry with vertex and index buffers
//!
//! # Vertex Layout
//!
//! The [`Vertex3d`] struct uses the following GPU layout (32 bytes per vertex):
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | uv        | Float32x2 | 24     | 2               |

use crate::gpu::GpuContext;
use crate::orientation::spherical_to_cartesian;

/// A vertex with position, normal, and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// The 3D position of this vertex in model space.
    pub position: [f32; 3],
    /// The surface normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates in the range [0, 1].
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout descriptor for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Segments around the equator of the panorama sphere.
pub const SPHERE_SEGMENTS: u32 = 60;
/// Rings from pole to pole of the panorama sphere.
pub const SPHERE_RINGS: u32 = 40;

/// An inverted UV sphere, built on the CPU.
///
/// Vertices are placed with [`spherical_to_cartesian`], so texture column
/// `u` corresponds to `yaw / 360` and row `v` runs from the top pole (`0`)
/// to the bottom pole (`1`). Triangles are wound counter-clockwise when seen
/// from the centre and normals point inward.
#[derive(Clone, Debug)]
pub struct SphereGeometry {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    pub fn inverted(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let pitch = 90.0 - 180.0 * v;

            for seg in 0..=segments {
                let u = seg as f32 / segments as f32;
                let yaw = 360.0 * u;

                let position = spherical_to_cartesian(yaw, pitch, radius);
                let normal = -position.normalize_or_zero();

                vertices.push(Vertex3d::new(position.into(), normal.into(), [u, v]));
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let next = current + segments + 1;

                indices.push(current);
                indices.push(next);
                indices.push(current + 1);

                indices.push(current + 1);
                indices.push(next);
                indices.push(next + 1);
            }
        }

        Self { vertices, indices }
    }
}

/// GPU-resident mesh geometry with vertex and index buffers.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Creates a mesh from raw vertex and index data.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Upload CPU-side sphere geometry.
    pub fn from_geometry(gpu: &GpuContext, geometry: &SphereGeometry) -> Self {
        Self::new(gpu, &geometry.vertices, &geometry.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::SPHERE_RADIUS;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn sphere() -> SphereGeometry {
        SphereGeometry::inverted(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_RINGS)
    }

    #[test]
    fn vertex_and_index_counts() {
        let geometry = sphere();
        assert_eq!(geometry.vertices.len(), (61 * 41) as usize);
        assert_eq!(geometry.indices.len(), (60 * 40 * 6) as usize);
        let max = geometry.vertices.len() as u32;
        assert!(geometry.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn vertices_lie_on_the_sphere_with_inward_normals() {
        for vertex in sphere().vertices {
            let position = Vec3::from(vertex.position);
            let normal = Vec3::from(vertex.normal);
            assert_relative_eq!(position.length(), SPHERE_RADIUS, epsilon = 0.01);
            assert!(normal.dot(position) < 0.0);
        }
    }

    #[test]
    fn triangles_face_the_centre() {
        let geometry = sphere();
        for tri in geometry.indices.chunks_exact(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(geometry.vertices[i as usize].position));
            let face = (b - a).cross(c - a);
            // Triangles touching a pole collapse to zero area.
            if face.length() < 1e-3 {
                continue;
            }
            assert!(face.dot(a) < 0.0, "triangle {:?} faces outward", tri);
        }
    }

    #[test]
    fn texture_column_tracks_yaw() {
        let geometry = sphere();
        // Equator, a quarter of the way round.
        let row = SPHERE_RINGS / 2;
        let seg = SPHERE_SEGMENTS / 4;
        let vertex = geometry.vertices[(row * (SPHERE_SEGMENTS + 1) + seg) as usize];
        assert_relative_eq!(vertex.uv[0], 0.25);
        assert_relative_eq!(vertex.uv[1], 0.5);
        let expected = spherical_to_cartesian(90.0, 0.0, SPHERE_RADIUS);
        assert!(Vec3::from(vertex.position).abs_diff_eq(expected, 1e-3));
    }
}
