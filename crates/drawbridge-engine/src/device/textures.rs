use std::collections::HashMap;

use anyhow::Result;

use crate::render::TextureId;

/// Identifier of the built-in 1x1 white texture used by untextured GUI draws.
pub const WHITE_TEXTURE: &str = "drawbridge:white";

/// Lightmap edge length (16 block x 16 sky levels).
const LIGHTMAP_SIZE: u32 = 16;

/// A registered texture with its bind groups for both passes.
pub struct GpuTexture {
    pub size: (u32, u32),
    pub(super) world_bind_group: wgpu::BindGroup,
    pub(super) gui_bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

/// Named RGBA8 textures plus the shared samplers and lightmap.
pub struct TextureRegistry {
    device: wgpu::Device,
    queue: wgpu::Queue,

    world_layout: wgpu::BindGroupLayout,
    gui_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    lightmap_sampler: wgpu::Sampler,
    lightmap_view: wgpu::TextureView,
    _lightmap: wgpu::Texture,

    textures: HashMap<TextureId, GpuTexture>,
}

impl TextureRegistry {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let world_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("drawbridge entity texture bgl"),
            entries: &[texture_entry(0), sampler_entry(1), texture_entry(2), sampler_entry(3)],
        });
        let gui_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("drawbridge gui texture bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        // Sampler0: pixel-art textures stay crisp.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("drawbridge Sampler0"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        // Sampler2: lightmap.
        let lightmap_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("drawbridge Sampler2"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let lightmap = upload_rgba(device, queue, "drawbridge lightmap", LIGHTMAP_SIZE, LIGHTMAP_SIZE, &lightmap_pixels());
        let lightmap_view = lightmap.create_view(&wgpu::TextureViewDescriptor::default());

        let mut registry = Self {
            device: device.clone(),
            queue: queue.clone(),
            world_layout,
            gui_layout,
            sampler,
            lightmap_sampler,
            lightmap_view,
            _lightmap: lightmap,
            textures: HashMap::new(),
        };
        registry.insert(TextureId::new(WHITE_TEXTURE), 1, 1, &[0xFF; 4]);
        registry
    }

    pub fn world_layout(&self) -> &wgpu::BindGroupLayout {
        &self.world_layout
    }

    pub fn gui_layout(&self) -> &wgpu::BindGroupLayout {
        &self.gui_layout
    }

    /// Uploads tightly packed RGBA8 pixels under `id`, replacing any previous upload.
    pub fn register(&mut self, id: TextureId, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
        anyhow::ensure!(width > 0 && height > 0, "texture `{id}` has zero size");
        let Some(expected) = rgba_len(width, height) else {
            anyhow::bail!("texture `{id}`: {width}x{height} is too large");
        };
        anyhow::ensure!(
            rgba.len() == expected,
            "texture `{id}`: expected {expected} bytes of RGBA8, got {}",
            rgba.len()
        );
        self.insert(id, width, height, rgba);
        Ok(())
    }

    /// Registers a `size`x`size` two-color checkerboard; handy for demos and missing assets.
    pub fn register_checker(&mut self, id: TextureId, size: u32, a: [u8; 4], b: [u8; 4]) -> Result<()> {
        let Some(len) = rgba_len(size, size) else {
            anyhow::bail!("checker `{id}`: {size}x{size} is too large");
        };
        let mut rgba = Vec::with_capacity(len);
        for y in 0..size {
            for x in 0..size {
                rgba.extend_from_slice(if (x + y) % 2 == 0 { &a } else { &b });
            }
        }
        self.register(id, size, size, &rgba)
    }

    #[inline]
    pub fn contains(&self, id: &TextureId) -> bool {
        self.textures.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: &TextureId) -> Option<&GpuTexture> {
        self.textures.get(id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn insert(&mut self, id: TextureId, width: u32, height: u32, rgba: &[u8]) {
        let label = format!("drawbridge texture {id}");
        let texture = upload_rgba(&self.device, &self.queue, &label, width, height, rgba);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let world_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout: &self.world_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(&self.lightmap_view) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&self.lightmap_sampler) },
            ],
        });
        let gui_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout: &self.gui_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&self.sampler) },
            ],
        });

        log::debug!("registered texture {id} ({width}x{height})");
        self.textures.insert(
            id,
            GpuTexture { size: (width, height), world_bind_group, gui_bind_group, _texture: texture },
        );
    }
}

/// Byte length of a tightly packed RGBA8 image, or `None` on overflow.
fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );
    texture
}

/// Brightness ramp: block light along x, sky light along y.
fn lightmap_pixels() -> Vec<u8> {
    let mut out = Vec::with_capacity((LIGHTMAP_SIZE * LIGHTMAP_SIZE * 4) as usize);
    for sky in 0..LIGHTMAP_SIZE {
        for block in 0..LIGHTMAP_SIZE {
            let level = block.max(sky) as f32 / (LIGHTMAP_SIZE - 1) as f32;
            let v = (0.05 + 0.95 * level * level) * 255.0;
            let v = v.round() as u8;
            out.extend_from_slice(&[v, v, v, 0xFF]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_len_counts_four_bytes_per_pixel() {
        assert_eq!(rgba_len(16, 16), Some(1024));
        assert_eq!(rgba_len(1, 1), Some(4));
    }

    #[test]
    fn rgba_len_reports_overflow() {
        assert_eq!(rgba_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn lightmap_brightens_with_either_light_level() {
        let px = lightmap_pixels();
        assert_eq!(Some(px.len()), rgba_len(LIGHTMAP_SIZE, LIGHTMAP_SIZE));
        let at = |block: u32, sky: u32| px[((sky * LIGHTMAP_SIZE + block) * 4) as usize];
        assert!(at(0, 0) < at(15, 0));
        assert_eq!(at(15, 0), at(0, 15));
        assert_eq!(at(15, 15), 0xFF);
    }
}
