//! Textured-sphere rendering for the active scene.
//!
//! [`PanoramaRenderer`] owns every GPU resource of a session:
//!
//! - the inverted sphere mesh, built once
//! - the active scene's texture and bind group, replaced on each scene change
//! - the hotspot marker overlay and the fade overlay
//!
//! One render pass per frame draws the sphere, then the markers, then the
//! fade on top.

use std::fmt::Display;

use crate::camera::Camera;
use crate::error::PanoramaError;
use crate::frame::FrameOutput;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, SPHERE_RINGS, SPHERE_SEGMENTS, SphereGeometry, Vertex3d};
use crate::orientation::SPHERE_RADIUS;
use crate::overlay::{Color, MarkerBatch, OverlayPass};
use crate::scene::{Scene, TransitionPass};
use crate::texture::Texture;

/// Camera uniforms for the sphere shader.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
}

/// GPU state for the scene currently on screen.
struct SceneResources {
    /// Kept alive for as long as the bind group refers to it.
    #[allow(dead_code)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Holds at most one scene's resources.
///
/// The old resources are dropped before the loader for the new ones runs, so
/// no more than one scene is ever alive. A failed load installs the fallback.
struct SceneSlot<T> {
    active: Option<(usize, T)>,
}

impl<T> SceneSlot<T> {
    fn new() -> Self {
        Self { active: None }
    }

    fn index(&self) -> Option<usize> {
        self.active.as_ref().map(|(index, _)| *index)
    }

    fn get(&self) -> Option<&T> {
        self.active.as_ref().map(|(_, resources)| resources)
    }

    fn clear(&mut self) {
        self.active = None;
    }

    /// Returns `false` when `load` failed and `fallback` was installed.
    fn replace<E: Display>(
        &mut self,
        index: usize,
        load: impl FnOnce() -> Result<T, E>,
        fallback: impl FnOnce() -> T,
    ) -> bool {
        self.active = None;
        let (resources, loaded) = match load() {
            Ok(resources) => (resources, true),
            Err(err) => {
                log::error!("[render] {}", err);
                (fallback(), false)
            }
        };
        self.active = Some((index, resources));
        loaded
    }
}

/// Renders the panorama sphere, hotspot markers and the fade overlay.
pub struct PanoramaRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sphere: Mesh,
    scene: SceneSlot<SceneResources>,
    markers: MarkerBatch,
    overlay: OverlayPass,
    fade: TransitionPass,
}

impl PanoramaRenderer {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Panorama Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/panorama.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Panorama Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Panorama Camera Layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Panorama Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Panorama Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Panorama Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Panorama Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let geometry = SphereGeometry::inverted(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_RINGS);
        let sphere = Mesh::from_geometry(gpu, &geometry);

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            texture_bind_group_layout,
            sphere,
            scene: SceneSlot::new(),
            markers: MarkerBatch::new(),
            overlay: OverlayPass::new(gpu),
            fade: TransitionPass::new(gpu, Color::BLACK),
        }
    }

    /// Index of the scene whose texture is bound, if any.
    pub fn loaded_scene(&self) -> Option<usize> {
        self.scene.index()
    }

    /// Replace the bound texture with scene `index`'s image.
    ///
    /// The previous texture is released before the new image is decoded. A
    /// failed load is logged and leaves a grey placeholder bound.
    pub fn load_scene(&mut self, gpu: &GpuContext, index: usize, scene: &Scene) {
        let layout = &self.texture_bind_group_layout;
        self.scene.replace(
            index,
            || {
                let texture = Texture::from_file(gpu, &scene.image)?;
                log::info!(
                    "[render] loaded '{}' ({}x{})",
                    scene.image,
                    texture.width,
                    texture.height
                );
                Ok::<_, PanoramaError>(scene_resources(gpu, layout, texture))
            },
            || scene_resources(gpu, layout, Texture::placeholder(gpu)),
        );
    }

    /// Drop the active scene's GPU resources.
    pub fn unload_scene(&mut self) {
        self.scene.clear();
    }

    fn write_camera(&self, gpu: &GpuContext, camera: &Camera) {
        let uniforms = CameraUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Draw one frame and present it.
    ///
    /// `hovered` is the index of the hotspot under the pointer.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        frame: &FrameOutput,
        hovered: Option<usize>,
        overlay_alpha: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.write_camera(gpu, &frame.camera);
        self.markers.clear();
        self.markers.hotspots(&frame.placements, hovered);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Panorama Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panorama Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(scene) = self.scene.get() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_bind_group(1, &scene.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.sphere.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.sphere.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.sphere.index_count, 0, 0..1);
            }

            self.overlay.render(gpu, &mut render_pass, &self.markers);
            self.fade.render(gpu, &mut render_pass, overlay_alpha);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn scene_resources(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    texture: Texture,
) -> SceneResources {
    let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Panorama Texture Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    });
    SceneResources {
        texture,
        bind_group,
    }
}
