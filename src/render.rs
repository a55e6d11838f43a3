//! Per-group appearance selection and instanced drawing.
//!
//! Every material group of a model is drawn with one call. What the fragment shader
//! sees for that call is an [`Appearance`]: either the material's diffuse texture,
//! its flat diffuse colour, or (when the group names a material that the library
//! never defined) a plain white fallback. Emission comes from the material in the
//! first two cases and is off in the third.
//!
//! # Key types
//!
//! - [`Appearance`] is picked once per group when the model is uploaded
//! - [`GroupFilter`] restricts a placement to some of a model's groups
//! - [`DrawLog`] describes what gets drawn during the first frame only
//! - [`DrawModel`] extends [`wgpu::RenderPass`] with instanced group draws

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{
    data_structures::model::{Material, MaterialTable},
    resources::mesh::{GpuMaterialGroup, GpuModel},
};

/// Where a group's colour comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppearanceKind {
    Textured,
    Flat,
    /// The group's material is not in the table.
    Fallback,
}

/// Uniform values for one material group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub kind: AppearanceKind,
    pub object_color: [f32; 3],
    pub has_emission: bool,
    pub emission_color: [f32; 3],
}

impl Appearance {
    /// No texture, white, no emission.
    pub const FALLBACK: Appearance = Appearance {
        kind: AppearanceKind::Fallback,
        object_color: [1.0, 1.0, 1.0],
        has_emission: false,
        emission_color: [0.0, 0.0, 0.0],
    };

    pub fn for_material(material: Option<&Material>) -> Self {
        let Some(material) = material else {
            return Self::FALLBACK;
        };
        if material.has_texture && material.texture.is_some() {
            Self {
                kind: AppearanceKind::Textured,
                object_color: [1.0, 1.0, 1.0],
                has_emission: material.has_emission,
                emission_color: material.emission_color,
            }
        } else {
            Self {
                kind: AppearanceKind::Flat,
                object_color: material.diffuse_color,
                has_emission: material.has_emission,
                emission_color: material.emission_color,
            }
        }
    }

    /// Looks `group_name` up in `materials`, warning when it is missing.
    pub fn for_group(materials: &MaterialTable, group_name: &str) -> Self {
        let material = materials.get(group_name);
        if material.is_none() {
            log::warn!(
                "Material '{}' not found, drawing with the default appearance.",
                group_name
            );
        }
        Self::for_material(material)
    }

    pub fn uses_texture(&self) -> bool {
        self.kind == AppearanceKind::Textured
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            object_color: self.object_color,
            use_texture: self.uses_texture() as u32,
            emission_color: self.emission_color,
            has_emission: self.has_emission as u32,
        }
    }
}

/// GPU layout of [`Appearance`], matching `MaterialUniform` in the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub object_color: [f32; 3],
    pub use_texture: u32,
    pub emission_color: [f32; 3],
    pub has_emission: u32,
}

/// Which material groups of a model a placement draws.
///
/// Used to draw one part of a model (a truck's glowing headlights, say) in a
/// separate pass from the rest of it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupFilter {
    #[default]
    All,
    Only(String),
    Except(String),
}

impl GroupFilter {
    pub fn admits(&self, material_name: &str) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Only(name) => name == material_name,
            GroupFilter::Except(name) => name != material_name,
        }
    }
}

/// Per-group diagnostics for the first rendered frame.
#[derive(Debug, Default)]
pub struct DrawLog {
    first_frame_done: bool,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_first_frame(&self) -> bool {
        !self.first_frame_done
    }

    /// Logs how `group_name` is drawn. Returns whether anything was logged.
    pub fn record(&self, model_name: &str, group_name: &str, appearance: &Appearance) -> bool {
        if self.first_frame_done {
            return false;
        }
        match appearance.kind {
            AppearanceKind::Textured => log::info!(
                "Drawing {}/{} with texture, emission: {}",
                model_name,
                group_name,
                appearance.has_emission
            ),
            AppearanceKind::Flat => log::info!(
                "Drawing {}/{} without texture, color: {:?} emission: {}",
                model_name,
                group_name,
                appearance.object_color,
                appearance.has_emission
            ),
            AppearanceKind::Fallback => log::info!(
                "Drawing {}/{} - material NOT FOUND",
                model_name,
                group_name
            ),
        }
        true
    }

    pub fn finish_frame(&mut self) {
        self.first_frame_done = true;
    }
}

pub trait DrawModel<'a> {
    fn draw_group_instanced(&mut self, group: &'a GpuMaterialGroup, instances: Range<u32>);

    /// Draws every group `filter` admits. Returns the number of groups drawn.
    fn draw_model_instanced(
        &mut self,
        model: &'a GpuModel,
        filter: &GroupFilter,
        instances: Range<u32>,
    ) -> usize;
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_group_instanced(&mut self, group: &'b GpuMaterialGroup, instances: Range<u32>) {
        self.set_vertex_buffer(0, group.vertex_buffer.slice(..));
        self.set_bind_group(0, &group.bind_group, &[]);
        self.draw(0..group.vertex_count, instances);
    }

    fn draw_model_instanced(
        &mut self,
        model: &'b GpuModel,
        filter: &GroupFilter,
        instances: Range<u32>,
    ) -> usize {
        let mut drawn = 0;
        for group in model.groups.iter() {
            if filter.admits(&group.material_name) {
                self.draw_group_instanced(group, instances.clone());
                drawn += 1;
            }
        }
        drawn
    }
}
