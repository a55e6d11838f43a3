use std::{fs, path::Path};

use crate::{
    data_structures::model::{MaterialTable, Model},
    error::{LoadError, Result},
    resources::texture::TextureDecoder,
};

/**
 * This module contains all logic for loading meshes, materials and textures from external files.
 */
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod texture;

pub fn load_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads an OBJ mesh and the material library it references.
///
/// The material library and its textures are resolved relative to the mesh's
/// directory. Only an unreadable or malformed mesh fails the load; material and
/// texture problems are logged and leave defaults in place.
pub fn load_model_obj(path: &Path, decoder: &mut dyn TextureDecoder) -> Result<Model> {
    let text = load_string(path)?;
    let directory = path.parent().unwrap_or_else(|| Path::new(""));

    let material_library = obj::find_material_library(&text);
    let materials = match &material_library {
        Some(library) => mtl::load_material_library(&directory.join(library), directory, decoder),
        None => MaterialTable::new(),
    };

    let groups = obj::parse_obj(&text, path)?;
    let model = Model {
        groups,
        materials,
        material_library,
    };

    log::info!(
        "Loaded {}: {} groups, {} materials, {} vertices.",
        path.display(),
        model.groups.len(),
        model.materials.len(),
        model.vertex_count()
    );
    for group in model.groups.iter() {
        log::debug!(
            "  group '{}': {} vertices",
            group.material_name,
            group.vertex_count()
        );
    }
    Ok(model)
}
