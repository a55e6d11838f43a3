use std::{path::PathBuf, sync::Arc};

use promenade::{
    data_structures::model::{Material, MaterialTable, MaterialTexture},
    flow::Action,
    pipelines::basic::FogUniform,
    render::{Appearance, AppearanceKind, DrawLog, GroupFilter},
};
use winit::keyboard::KeyCode;

mod common;
use common::init_logger;

fn textured(name: &str) -> Material {
    let mut material = Material::new(name);
    material.diffuse_color = [0.3, 0.3, 0.3];
    material.texture = Some(MaterialTexture {
        path: PathBuf::from("bark.png"),
        image: Arc::new(image::RgbaImage::new(1, 1)),
    });
    material.has_texture = true;
    material
}

#[test]
fn should_draw_textured_material_with_white_base() {
    let appearance = Appearance::for_material(Some(&textured("bark")));
    assert_eq!(appearance.kind, AppearanceKind::Textured);
    assert!(appearance.uses_texture());
    assert_eq!(appearance.object_color, [1.0, 1.0, 1.0]);
}

#[test]
fn should_draw_untextured_material_with_diffuse_colour() {
    let mut bulb = Material::new("bulb");
    bulb.diffuse_color = [0.0, 0.0, 0.0];
    bulb.emission_color = [1.0, 0.9, 0.6];
    bulb.has_emission = true;

    let appearance = Appearance::for_material(Some(&bulb));
    assert_eq!(appearance.kind, AppearanceKind::Flat);
    assert_eq!(appearance.object_color, [0.0, 0.0, 0.0]);
    assert!(appearance.has_emission);
    assert_eq!(appearance.emission_color, [1.0, 0.9, 0.6]);

    let uniform = appearance.to_uniform();
    assert_eq!(uniform.use_texture, 0);
    assert_eq!(uniform.has_emission, 1);
}

#[test]
fn should_fall_back_to_white_for_unknown_material() {
    init_logger();
    let mut table = MaterialTable::new();
    table.insert(textured("bark"));

    let appearance = Appearance::for_group(&table, "missing");
    assert_eq!(appearance, Appearance::FALLBACK);
    assert_eq!(appearance.object_color, [1.0, 1.0, 1.0]);
    assert!(!appearance.has_emission);
    assert!(!appearance.uses_texture());

    assert_eq!(
        Appearance::for_group(&table, "bark").kind,
        AppearanceKind::Textured
    );
}

#[test]
fn should_pack_material_uniform_in_32_bytes() {
    assert_eq!(std::mem::size_of::<promenade::render::MaterialUniform>(), 32);
    assert_eq!(std::mem::size_of::<FogUniform>(), 32);
}

#[test]
fn should_admit_groups_by_filter() {
    assert!(GroupFilter::All.admits("anything"));

    let only = GroupFilter::Only("Material.003".to_string());
    assert!(only.admits("Material.003"));
    assert!(!only.admits("Body"));

    let except = GroupFilter::Except("Material.003".to_string());
    assert!(!except.admits("Material.003"));
    assert!(except.admits("Body"));
}

#[test]
fn should_describe_only_first_frame() {
    init_logger();
    let mut log = DrawLog::new();
    assert!(log.is_first_frame());
    assert!(log.record("lamp", "bulb", &Appearance::FALLBACK));

    log.finish_frame();
    assert!(!log.is_first_frame());
    assert!(!log.record("lamp", "bulb", &Appearance::FALLBACK));
}

#[test]
fn should_toggle_fog_flag() {
    let mut fog = FogUniform::new([0.2, 0.2, 0.25], 0.004, false);
    assert!(!fog.is_enabled());
    fog.set_enabled(true);
    assert!(fog.is_enabled());
}

#[test]
fn should_map_command_keys_to_actions() {
    assert_eq!(Action::for_key(KeyCode::KeyB), Some(Action::ToggleCollision));
    assert_eq!(Action::for_key(KeyCode::Digit0), Some(Action::ToggleFog));
    assert_eq!(Action::for_key(KeyCode::Escape), Some(Action::Exit));
    assert_eq!(Action::for_key(KeyCode::KeyW), None);
}
