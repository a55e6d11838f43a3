//! Texture decoding and the material bind group layout.
//!
//! Image decoding sits behind [`TextureDecoder`] so the MTL loader can be driven
//! without touching the file system or a GPU.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Turns an image file into RGBA8 pixels.
pub trait TextureDecoder {
    fn decode(&mut self, path: &Path) -> anyhow::Result<image::RgbaImage>;
}

/// Decodes any format the `image` crate was built with.
///
/// Rows are flipped by default: OBJ texture coordinates put `v = 0` at the bottom
/// of the image while image files store the top row first.
#[derive(Clone, Debug)]
pub struct ImageFileDecoder {
    pub flip_vertically: bool,
    decoded: Vec<PathBuf>,
}

impl ImageFileDecoder {
    pub fn new(flip_vertically: bool) -> Self {
        Self {
            flip_vertically,
            decoded: Vec::new(),
        }
    }

    /// Files decoded successfully so far, in order.
    pub fn decoded(&self) -> &[PathBuf] {
        &self.decoded
    }
}

impl Default for ImageFileDecoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TextureDecoder for ImageFileDecoder {
    fn decode(&mut self, path: &Path) -> anyhow::Result<image::RgbaImage> {
        let img = image::open(path)
            .with_context(|| format!("failed to decode texture {}", path.display()))?;
        let mut rgba = img.to_rgba8();
        if self.flip_vertically {
            image::imageops::flip_vertical_in_place(&mut rgba);
        }
        log::debug!(
            "Decoded texture {} ({}x{}).",
            path.display(),
            rgba.width(),
            rgba.height()
        );
        self.decoded.push(path.to_path_buf());
        Ok(rgba)
    }
}

/// Group 0 of the scene pipeline: diffuse texture, its sampler and the per-group
/// material uniform.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}
