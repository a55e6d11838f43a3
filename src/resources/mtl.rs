//! Wavefront MTL material libraries.
//!
//! Only `newmtl`, `Kd`, `Ke` and `map_Kd` are understood. A broken library never
//! fails the mesh that references it: problems are logged and the affected
//! material keeps its defaults.

use std::{fs, path::Path, sync::Arc};

use crate::{
    data_structures::model::{Material, MaterialTable, MaterialTexture},
    resources::{obj::parse_floats, texture::TextureDecoder},
};

/// Emission strength (sum of RGB) above which a material may glow.
pub const EMISSION_THRESHOLD: f32 = 0.1;
/// Diffuse strength (sum of RGB) below which an emitting material is treated as a light.
pub const DIFFUSE_THRESHOLD: f32 = 0.1;

/// Reads and parses the library at `path`. Texture paths resolve against `texture_dir`.
///
/// An unreadable file yields an empty table and a warning.
pub fn load_material_library(
    path: &Path,
    texture_dir: &Path,
    decoder: &mut dyn TextureDecoder,
) -> MaterialTable {
    match fs::read_to_string(path) {
        Ok(text) => parse_mtl(&text, texture_dir, decoder),
        Err(e) => {
            log::warn!(
                "Could not open material library {}: {}",
                path.display(),
                e
            );
            MaterialTable::new()
        }
    }
}

/// Parses MTL text and runs the emissive classifier over the result.
pub fn parse_mtl(
    text: &str,
    texture_dir: &Path,
    decoder: &mut dyn TextureDecoder,
) -> MaterialTable {
    let mut table = MaterialTable::new();
    let mut current: Option<Material> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };

        if directive == "newmtl" {
            if let Some(done) = current.take() {
                add_material(&mut table, done);
            }
            match tokens.next() {
                Some(name) => current = Some(Material::new(name)),
                None => log::warn!("Line {}: 'newmtl' without a name.", line_no),
            }
            continue;
        }

        let Some(material) = current.as_mut() else {
            continue;
        };
        match directive {
            "Kd" => match parse_floats::<3>("Kd", &mut tokens, 3) {
                Ok(rgb) => material.diffuse_color = rgb,
                Err(e) => log::warn!("Line {}: ignoring Kd of '{}': {}", line_no, material.name, e),
            },
            "Ke" => match parse_floats::<3>("Ke", &mut tokens, 3) {
                Ok(rgb) => material.emission_color = rgb,
                Err(e) => log::warn!("Line {}: ignoring Ke of '{}': {}", line_no, material.name, e),
            },
            "map_Kd" => match texture_file_name(&line.trim_start()[directive.len()..]) {
                Some(file) => load_diffuse_map(material, &texture_dir.join(file), decoder),
                None => log::warn!("Line {}: 'map_Kd' without a file name.", line_no),
            },
            _ => (),
        }
    }
    if let Some(done) = current.take() {
        add_material(&mut table, done);
    }

    classify_emissive(&mut table);
    log::debug!("Parsed {} materials.", table.len());
    table
}

/// The file name of a texture map statement, after any `-option value...` pairs.
///
/// The rest of the line is the name, so `map_Kd -s 2 2 park bench.png` names
/// `park bench.png`.
pub fn texture_file_name(args: &str) -> Option<&str> {
    let mut rest = args.trim();
    while rest.starts_with('-') {
        let (option, tail) = split_token(rest);
        rest = tail;
        let (max_values, numeric_only) = match option {
            // One to three numbers
            "-o" | "-s" | "-t" => (3, true),
            "-mm" => (2, false),
            _ => (1, false),
        };
        for _ in 0..max_values {
            let (value, tail) = split_token(rest);
            if value.is_empty() || (numeric_only && value.parse::<f32>().is_err()) {
                break;
            }
            rest = tail;
        }
    }
    (!rest.is_empty()).then_some(rest)
}

fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

fn add_material(table: &mut MaterialTable, material: Material) {
    log::debug!(
        "Added material '{}' (texture: {}).",
        material.name,
        material.has_texture
    );
    if let Some(earlier) = table.insert(material) {
        log::debug!("Material '{}' was defined twice, keeping the later one.", earlier.name);
    }
}

fn load_diffuse_map(material: &mut Material, path: &Path, decoder: &mut dyn TextureDecoder) {
    log::debug!("Decoding {} for '{}'.", path.display(), material.name);
    match decoder.decode(path) {
        Ok(image) => {
            log::info!(
                "Loaded diffuse texture {} for '{}'.",
                path.display(),
                material.name
            );
            material.texture = Some(MaterialTexture {
                path: path.to_path_buf(),
                image: Arc::new(image),
            });
            material.has_texture = true;
        }
        Err(e) => log::warn!("Texture for '{}' unavailable: {:#}", material.name, e),
    }
}

/// A bright emission on a dark, untextured surface: the material of a lamp bulb.
pub fn is_emissive(material: &Material) -> bool {
    let emission: f32 = material.emission_color.iter().sum();
    let diffuse: f32 = material.diffuse_color.iter().sum();
    emission > EMISSION_THRESHOLD && !material.has_texture && diffuse < DIFFUSE_THRESHOLD
}

/// Marks every qualifying material as emissive. Never clears the flag, so running it
/// twice changes nothing.
pub fn classify_emissive(table: &mut MaterialTable) {
    for material in table.iter_mut() {
        if !material.has_emission && is_emissive(material) {
            material.has_emission = true;
            log::info!(
                "Material '{}' is emissive (Ke = {:?}).",
                material.name,
                material.emission_color
            );
        }
    }
}
