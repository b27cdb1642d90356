use crate::error::{PanoramaError, Result};
use crate::gpu::GpuContext;

/// Mid grey shown in place of a scene image that failed to load.
const PLACEHOLDER_RGBA: [u8; 4] = [96, 96, 96, 255];

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Wrap around the seam horizontally, never across the poles.
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Load an equirectangular image from disk.
    ///
    /// Images larger than the device's texture limit are downscaled to fit.
    pub fn from_file(gpu: &GpuContext, path: &str) -> Result<Self> {
        let img = image::open(path).map_err(|source| PanoramaError::ImageLoad {
            path: path.to_string(),
            source,
        })?;

        let max = gpu.device.limits().max_texture_dimension_2d;
        let img = if img.width() > max || img.height() > max {
            log::warn!(
                "[texture] '{}' is {}x{}, downscaling to fit {}",
                path,
                img.width(),
                img.height(),
                max
            );
            img.resize(max, max, image::imageops::FilterType::Triangle)
        } else {
            img
        };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::from_rgba(gpu, &rgba, width, height, path))
    }

    /// A 1x1 grey texture used when a scene image cannot be loaded.
    pub fn placeholder(gpu: &GpuContext) -> Self {
        Self::from_rgba(gpu, &PLACEHOLDER_RGBA, 1, 1, "Placeholder Texture")
    }
}
