//! CPU-side model data produced by the OBJ/MTL loaders.
//!
//! A [`Model`] is a list of [`MaterialGroup`]s (non-indexed triangle lists, one per
//! material that was active while faces were parsed) plus the [`MaterialTable`]
//! read from the companion material library. Everything here is built once at load
//! time and never mutated afterwards.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Name used for faces that appear before any `usemtl` directive.
pub const DEFAULT_MATERIAL: &str = "default";

/// Number of scalars in one interleaved vertex record.
pub const FLOATS_PER_VERTEX: usize = 11;

/// Describes how a vertex type is laid out in a GPU vertex buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// One fully expanded vertex: position, normal, texture coordinate and colour.
///
/// The layout is exactly eleven `f32`s so a slice of records can be handed to the
/// GPU (or inspected as flat floats) without conversion. Colour is always white;
/// the material decides the final colour at draw time.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub color: [f32; 3],
}

impl ModelVertex {
    pub const DEFAULT_POSITION: [f32; 3] = [0.0, 0.0, 0.0];
    pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
    pub const DEFAULT_TEX_COORDS: [f32; 2] = [0.0, 0.0];
    pub const COLOR: [f32; 3] = [1.0, 1.0, 1.0];

    /// The eleven scalars in `(px,py,pz, nx,ny,nz, u,v, r,g,b)` order.
    pub fn to_array(&self) -> [f32; FLOATS_PER_VERTEX] {
        bytemuck::cast(*self)
    }
}

impl Default for ModelVertex {
    fn default() -> Self {
        Self {
            position: Self::DEFAULT_POSITION,
            normal: Self::DEFAULT_NORMAL,
            tex_coords: Self::DEFAULT_TEX_COORDS,
            color: Self::COLOR,
        }
    }
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// All triangles that were parsed while one material was active.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialGroup {
    pub material_name: String,
    pub vertices: Vec<ModelVertex>,
}

impl MaterialGroup {
    pub fn new(material_name: impl Into<String>, vertices: Vec<ModelVertex>) -> Self {
        Self {
            material_name: material_name.into(),
            vertices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.as_floats().len() / FLOATS_PER_VERTEX
    }

    /// The group as one contiguous run of interleaved scalars.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// A decoded diffuse texture and the file it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialTexture {
    pub path: PathBuf,
    pub image: Arc<image::RgbaImage>,
}

/// Surface description read from a `newmtl` block.
///
/// `has_texture` is only ever set after a successful decode; `has_emission` is
/// derived by the emissive classifier and never read from the file.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse_color: [f32; 3],
    pub emission_color: [f32; 3],
    pub texture: Option<MaterialTexture>,
    pub has_texture: bool,
    pub has_emission: bool,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse_color: [1.0, 1.0, 1.0],
            emission_color: [0.0, 0.0, 0.0],
            texture: None,
            has_texture: false,
            has_emission: false,
        }
    }
}

/// Materials keyed by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialTable {
    materials: HashMap<String, Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `material` under its own name, replacing any earlier definition.
    pub fn insert(&mut self, material: Material) -> Option<Material> {
        self.materials.insert(material.name.clone(), material)
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.values_mut()
    }

    pub fn any_textured(&self) -> bool {
        self.materials.values().any(|m| m.has_texture)
    }
}

/// A loaded mesh: its material groups and the materials they refer to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub groups: Vec<MaterialGroup>,
    pub materials: MaterialTable,
    /// The first `mtllib` reference found in the mesh, if any.
    pub material_library: Option<String>,
}

impl Model {
    /// Total number of vertices across all groups.
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(MaterialGroup::vertex_count).sum()
    }

    pub fn has_texture(&self) -> bool {
        self.materials.any_textured()
    }

    pub fn group(&self, material_name: &str) -> Option<&MaterialGroup> {
        self.groups.iter().find(|g| g.material_name == material_name)
    }
}
