//! GPU resources for a stone surface material.
//!
//! Uploads the CPU-side [`MaterialDescriptor`] (diffuse + derived normal
//! rasters, tiling, finish constants) into wgpu textures and a uniform
//! buffer, bound as one bind group shared by every mesh in the scene.

use wgpu::util::DeviceExt;

use stonescope_core::material::MaterialDescriptor;
use stonescope_core::raster::Raster;

/// Finish and tiling uniforms for GPU.
/// Note: layout must match WGSL `FinishUniforms` exactly (48 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FinishUniforms {
    /// Texture repeats along U and V.
    pub repeat: [f32; 2],
    /// Microfacet roughness.
    pub roughness: f32,
    /// Metalness factor.
    pub metalness: f32,
    /// Fresnel reflectivity at normal incidence.
    pub reflectivity: f32,
    /// Clearcoat layer weight.
    pub clearcoat: f32,
    /// Clearcoat roughness.
    pub clearcoat_roughness: f32,
    /// Environment contribution multiplier.
    pub env_map_intensity: f32,
    /// Normal map strength.
    pub normal_strength: f32,
    /// Padding to 16-byte alignment.
    pub _pad: [f32; 3],
}

impl FinishUniforms {
    /// Packs a material descriptor's tiling and finish.
    #[must_use]
    pub fn from_material(material: &MaterialDescriptor) -> Self {
        Self {
            repeat: [material.tiling.repeat_u, material.tiling.repeat_v],
            roughness: material.finish.roughness,
            metalness: material.finish.metalness,
            reflectivity: material.finish.reflectivity,
            clearcoat: material.finish.clearcoat,
            clearcoat_roughness: material.finish.clearcoat_roughness,
            env_map_intensity: material.finish.env_map_intensity,
            normal_strength: material.finish.normal_strength,
            _pad: [0.0; 3],
        }
    }
}

/// GPU-side stone material: textures, sampler, uniforms, bind group.
pub struct StoneMaterialGpu {
    /// Diffuse color texture (sRGB).
    pub diffuse_texture: wgpu::Texture,
    /// Tangent-space normal map (linear).
    pub normal_texture: wgpu::Texture,
    /// Finish uniform buffer.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group (group 1 in the stone pipeline).
    pub bind_group: wgpu::BindGroup,
}

impl StoneMaterialGpu {
    /// Uploads a material descriptor to the GPU.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        material: &MaterialDescriptor,
    ) -> Self {
        // Color data is sRGB, normal data stays linear.
        let diffuse_texture = upload_raster(
            device,
            queue,
            &material.diffuse,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            "stone diffuse",
        );
        let normal_texture = upload_raster(
            device,
            queue,
            &material.normal,
            wgpu::TextureFormat::Rgba8Unorm,
            "stone normal",
        );

        let diffuse_view = diffuse_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let normal_view = normal_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Repeat addressing is what makes the tiling factors meaningful.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("stone sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..wgpu::SamplerDescriptor::default()
        });

        let uniforms = FinishUniforms::from_material(material);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("finish uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("stone material bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&diffuse_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&normal_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            diffuse_texture,
            normal_texture,
            uniform_buffer,
            bind_group,
        }
    }
}

/// Creates the bind group layout for stone materials (group 1).
#[must_use]
pub fn create_material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("stone material bind group layout"),
        entries: &[
            // Finish uniforms
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(48),
                },
                count: None,
            },
            // Diffuse texture
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            // Normal texture
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            // Shared repeat sampler
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn upload_raster(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    raster: &Raster,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::Texture {
    let (width, height) = raster.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        raster.as_bytes(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}
