//! Screen-space hotspot markers.
//!
//! Markers are batched as colored triangles in window pixels and drawn in a
//! single call on top of the panorama. Each visible hotspot gets a translucent
//! ring with a solid dot in the middle; the hovered one is drawn larger.

use glam::Vec2;

use crate::gpu::GpuContext;
use crate::projector::{HotspotPlacement, MARKER_RADIUS};

/// RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    /// Ring around an idle marker.
    pub const MARKER_RING: Color = Color::rgba(1.0, 1.0, 1.0, 0.55);
    /// Dot in the middle of an idle marker.
    pub const MARKER_DOT: Color = Color::rgba(1.0, 1.0, 1.0, 0.9);
    /// Dot in the middle of the marker under the pointer.
    pub const MARKER_HOVER: Color = Color::rgba(1.0, 0.78, 0.25, 1.0);

    fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Vertex for colored 2D geometry, in window pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2d {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex2d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

/// Vertex capacity of a fresh overlay buffer. Grows on demand.
const INITIAL_VERTICES: usize = 16384;
/// Triangles used to approximate a circle.
const CIRCLE_SEGMENTS: usize = 24;

/// CPU-side batch of marker triangles for one frame.
#[derive(Clone, Debug, Default)]
pub struct MarkerBatch {
    vertices: Vec<Vertex2d>,
}

impl MarkerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex2d] {
        &self.vertices
    }

    /// A filled circle.
    pub fn disc(&mut self, center: Vec2, radius: f32, color: Color) {
        let c = color.to_array();
        for i in 0..CIRCLE_SEGMENTS {
            let a = circle_point(center, radius, i);
            let b = circle_point(center, radius, i + 1);
            self.vertices.extend_from_slice(&[
                Vertex2d {
                    position: center.into(),
                    color: c,
                },
                Vertex2d {
                    position: a.into(),
                    color: c,
                },
                Vertex2d {
                    position: b.into(),
                    color: c,
                },
            ]);
        }
    }

    /// A ring between `inner` and `outer` radii.
    pub fn ring(&mut self, center: Vec2, inner: f32, outer: f32, color: Color) {
        let c = color.to_array();
        for i in 0..CIRCLE_SEGMENTS {
            let i0 = circle_point(center, inner, i);
            let i1 = circle_point(center, inner, i + 1);
            let o0 = circle_point(center, outer, i);
            let o1 = circle_point(center, outer, i + 1);
            for position in [o0, i0, o1, o1, i0, i1] {
                self.vertices.push(Vertex2d {
                    position: position.into(),
                    color: c,
                });
            }
        }
    }

    /// One marker per visible hotspot. `hovered` is a hotspot index.
    pub fn hotspots(&mut self, placements: &[HotspotPlacement], hovered: Option<usize>) {
        for placement in placements {
            let Some(center) = placement.screen else {
                continue;
            };
            let is_hovered = hovered == Some(placement.index);
            let radius = if is_hovered {
                MARKER_RADIUS * 1.15
            } else {
                MARKER_RADIUS
            };
            let dot = if is_hovered {
                Color::MARKER_HOVER
            } else {
                Color::MARKER_DOT
            };
            self.ring(center, radius * 0.7, radius, Color::MARKER_RING);
            self.disc(center, radius * 0.4, dot);
        }
    }
}

fn circle_point(center: Vec2, radius: f32, i: usize) -> Vec2 {
    let angle = std::f32::consts::TAU * i as f32 / CIRCLE_SEGMENTS as f32;
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Buffer capacity, in vertices, needed to hold `needed` without truncation.
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Overlay Vertex Buffer"),
        size: (capacity * std::mem::size_of::<Vertex2d>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Draws a [`MarkerBatch`] with alpha blending.
pub struct OverlayPass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl OverlayPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Uniforms"),
            size: std::mem::size_of::<OverlayUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Overlay Uniform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Overlay Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex2d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer: create_vertex_buffer(device, INITIAL_VERTICES),
            vertex_capacity: INITIAL_VERTICES,
            uniform_buffer,
            uniform_bind_group,
        }
    }

    /// Draw `batch` into an open render pass.
    ///
    /// The vertex buffer is reallocated when the batch outgrows it, so every
    /// marker is drawn whole.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        batch: &MarkerBatch,
    ) {
        let vertices = batch.vertices();
        if vertices.is_empty() {
            return;
        }

        let capacity = grown_capacity(self.vertex_capacity, vertices.len());
        if capacity != self.vertex_capacity {
            log::debug!(
                "[overlay] growing vertex buffer {} -> {}",
                self.vertex_capacity,
                capacity
            );
            self.vertex_buffer = create_vertex_buffer(&gpu.device, capacity);
            self.vertex_capacity = capacity;
        }
        let count = vertices.len();

        let uniforms = OverlayUniforms {
            resolution: [gpu.width() as f32, gpu.height() as f32],
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        gpu.queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(vertices),
        );

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..count as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(index: usize, screen: Option<Vec2>) -> HotspotPlacement {
        HotspotPlacement {
            index,
            target: 0,
            screen,
            label: None,
        }
    }

    #[test]
    fn disc_stays_inside_its_radius() {
        let mut batch = MarkerBatch::new();
        let center = Vec2::new(50.0, 40.0);
        batch.disc(center, 10.0, Color::MARKER_DOT);
        assert_eq!(batch.vertices().len(), CIRCLE_SEGMENTS * 3);
        assert!(
            batch
                .vertices()
                .iter()
                .all(|v| Vec2::from(v.position).distance(center) <= 10.0 + 1e-4)
        );
    }

    #[test]
    fn culled_hotspots_get_no_marker() {
        let mut batch = MarkerBatch::new();
        batch.hotspots(
            &[placement(0, None), placement(1, Some(Vec2::new(10.0, 10.0)))],
            None,
        );
        // One ring plus one disc.
        assert_eq!(batch.vertices().len(), CIRCLE_SEGMENTS * 9);
    }

    #[test]
    fn many_markers_fit_after_growth() {
        let placements: Vec<_> = (0..80)
            .map(|i| placement(i, Some(Vec2::new(i as f32 * 20.0, 100.0))))
            .collect();
        let mut batch = MarkerBatch::new();
        batch.hotspots(&placements, None);

        let per_marker = CIRCLE_SEGMENTS * 9;
        assert_eq!(batch.vertices().len(), 80 * per_marker);
        assert!(batch.vertices().len() > INITIAL_VERTICES);

        let capacity = grown_capacity(INITIAL_VERTICES, batch.vertices().len());
        assert!(capacity >= 80 * per_marker);
        assert_eq!(grown_capacity(capacity, per_marker), capacity);
    }

    #[test]
    fn hovered_marker_uses_hover_color() {
        let mut batch = MarkerBatch::new();
        batch.hotspots(&[placement(3, Some(Vec2::ZERO))], Some(3));
        let last = batch.vertices().last().unwrap();
        assert_eq!(last.color, Color::MARKER_HOVER.to_array());

        batch.clear();
        assert!(batch.vertices().is_empty());
    }
}
