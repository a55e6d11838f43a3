use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{model::Model, texture::{self, Texture}},
    render::Appearance,
};

/// One material group living on the GPU: its vertices and the bind group that
/// carries its texture and [`Appearance`].
#[derive(Debug)]
pub struct GpuMaterialGroup {
    pub material_name: String,
    pub appearance: Appearance,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct GpuModel {
    pub name: String,
    pub groups: Vec<GpuMaterialGroup>,
}

impl GpuModel {
    pub fn vertex_count(&self) -> u32 {
        self.groups.iter().map(|g| g.vertex_count).sum()
    }
}

/**
 * Uploads every non-empty group of `model` as a plain (non-indexed) vertex buffer.
 *
 * Each textured material is uploaded once even if several groups were to share it.
 * Untextured groups bind a 1x1 white texture so all groups fit the same layout.
 */
pub fn upload_model(
    name: &str,
    model: &Model,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> GpuModel {
    let white = Texture::create_white(device, queue);
    let sampler = texture::create_default_sampler(device);
    let mut textures: HashMap<&str, Texture> = HashMap::new();

    let mut groups = Vec::with_capacity(model.groups.len());
    for group in model.groups.iter() {
        if group.vertices.is_empty() {
            continue;
        }
        let appearance = Appearance::for_group(&model.materials, &group.material_name);

        let diffuse = match model.materials.get(&group.material_name) {
            Some(material) if appearance.uses_texture() => match &material.texture {
                Some(tex) => &*textures
                    .entry(material.name.as_str())
                    .or_insert_with(|| {
                        Texture::from_image(device, queue, &tex.image, Some(&material.name))
                    }),
                None => &white,
            },
            _ => &white,
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}:{} Material Buffer", name, group.material_name)),
            contents: bytemuck::cast_slice(&[appearance.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
            label: Some(&format!("{}:{} Material Bind Group", name, group.material_name)),
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}:{} Vertex Buffer", name, group.material_name)),
            contents: bytemuck::cast_slice(&group.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        groups.push(GpuMaterialGroup {
            material_name: group.material_name.clone(),
            appearance,
            vertex_buffer,
            vertex_count: group.vertices.len() as u32,
            bind_group,
        });
    }

    GpuModel {
        name: name.to_string(),
        groups,
    }
}
