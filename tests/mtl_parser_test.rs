use std::path::Path;

use promenade::{
    data_structures::model::{Material, MaterialTable},
    resources::mtl::{
        classify_emissive, is_emissive, load_material_library, parse_mtl, texture_file_name,
    },
};

mod common;
use common::{AssetDir, StubDecoder, assert_close, init_logger};

fn parse(text: &str) -> MaterialTable {
    parse_mtl(text, Path::new("textures"), &mut StubDecoder::succeeding())
}

#[test]
fn should_read_diffuse_and_emission() {
    let table = parse("newmtl bench\nKd 0.5 0.3 0.1\nKe 0.0 0.0 0.0\n");
    let bench = table.get("bench").unwrap();
    assert_close(bench.diffuse_color, [0.5, 0.3, 0.1]);
    assert_close(bench.emission_color, [0.0, 0.0, 0.0]);
    assert!(!bench.has_texture);
    assert!(!bench.has_emission);
}

#[test]
fn should_default_to_white_without_kd() {
    let table = parse("newmtl plain\n");
    assert_close(table.get("plain").unwrap().diffuse_color, [1.0, 1.0, 1.0]);
}

#[test]
fn should_classify_dark_glowing_material_as_emissive() {
    let table = parse("newmtl bulb\nKd 0 0 0\nKe 1 1 1\n");
    assert!(table.get("bulb").unwrap().has_emission);
}

#[test]
fn should_not_classify_bright_diffuse_as_emissive() {
    let table = parse("newmtl shade\nKd 0.5 0.5 0.5\nKe 1 1 1\n");
    assert!(!table.get("shade").unwrap().has_emission);
}

#[test]
fn should_not_classify_textured_material_as_emissive() {
    let table = parse("newmtl sign\nKd 0 0 0\nKe 1 1 1\nmap_Kd sign.png\n");
    let sign = table.get("sign").unwrap();
    assert!(sign.has_texture);
    assert!(!sign.has_emission);
}

#[test]
fn should_require_emission_above_threshold() {
    let mut faint = Material::new("faint");
    faint.diffuse_color = [0.0, 0.0, 0.0];
    faint.emission_color = [0.03, 0.03, 0.03];
    assert!(!is_emissive(&faint));

    faint.emission_color = [0.05, 0.05, 0.05];
    assert!(is_emissive(&faint));
}

#[test]
fn should_classify_idempotently() {
    let mut table = parse("newmtl bulb\nKd 0 0 0\nKe 1 1 1\nnewmtl wood\nKd 0.6 0.4 0.2\n");
    let once = table.clone();
    classify_emissive(&mut table);
    assert_eq!(table, once);
}

#[test]
fn should_resolve_texture_against_texture_dir() {
    init_logger();
    let mut decoder = StubDecoder::succeeding();
    let table = parse_mtl(
        "newmtl bark\nmap_Kd -s 1 1 1 bark.jpg\n",
        Path::new("trees"),
        &mut decoder,
    );
    let bark = table.get("bark").unwrap();
    assert!(bark.has_texture);
    let texture = bark.texture.as_ref().unwrap();
    assert_eq!(texture.path, Path::new("trees").join("bark.jpg"));
    assert_eq!(texture.image.dimensions(), (1, 1));
    assert_eq!(decoder.requested, vec![Path::new("trees").join("bark.jpg")]);
}

#[test]
fn should_leave_texture_unset_when_decoding_fails() {
    init_logger();
    let mut decoder = StubDecoder::failing();
    let table = parse_mtl(
        "newmtl grass\nKd 0.1 0.6 0.1\nmap_Kd grass.png\n",
        Path::new("."),
        &mut decoder,
    );
    let grass = table.get("grass").unwrap();
    assert!(!grass.has_texture);
    assert!(grass.texture.is_none());
    assert_close(grass.diffuse_color, [0.1, 0.6, 0.1]);
    assert_eq!(decoder.requested.len(), 1);
}

#[test]
fn should_keep_later_definition_of_duplicate_name() {
    let table = parse("newmtl dup\nKd 1 0 0\nnewmtl dup\nKd 0 0 1\n");
    assert_eq!(table.len(), 1);
    assert_close(table.get("dup").unwrap().diffuse_color, [0.0, 0.0, 1.0]);
}

#[test]
fn should_ignore_directives_before_first_newmtl() {
    let table = parse("Kd 0 1 0\nKe 1 1 1\nnewmtl late\n");
    assert_eq!(table.len(), 1);
    let late = table.get("late").unwrap();
    assert_close(late.diffuse_color, [1.0, 1.0, 1.0]);
    assert!(!late.has_emission);
}

#[test]
fn should_ignore_malformed_colour_but_keep_material() {
    init_logger();
    let table = parse("newmtl odd\nKd 0.2 nope 0.2\nKe 0 0\n");
    let odd = table.get("odd").unwrap();
    assert_close(odd.diffuse_color, [1.0, 1.0, 1.0]);
    assert_close(odd.emission_color, [0.0, 0.0, 0.0]);
}

#[test]
fn should_ignore_unknown_directives() {
    let table = parse("newmtl glass\nNs 96\nKa 1 1 1\nKs 0.5 0.5 0.5\nd 0.3\nillum 2\nKd 0.1 0.1 0.1\n");
    assert_close(table.get("glass").unwrap().diffuse_color, [0.1, 0.1, 0.1]);
}

#[test]
fn should_return_empty_table_for_missing_library() {
    init_logger();
    let assets = AssetDir::new();
    let mut decoder = StubDecoder::succeeding();
    let table = load_material_library(&assets.path().join("absent.mtl"), assets.path(), &mut decoder);
    assert!(table.is_empty());
    assert!(decoder.requested.is_empty());
}

#[test]
fn should_load_library_from_disk() {
    let assets = AssetDir::new();
    let library = assets.write("park.mtl", "newmtl hedge\nKd 0.1 0.4 0.1\n");
    let table = load_material_library(&library, assets.path(), &mut StubDecoder::succeeding());
    assert_eq!(table.len(), 1);
    assert!(!table.any_textured());
}

#[test]
fn should_keep_spaces_in_texture_file_name() {
    let mut decoder = StubDecoder::succeeding();
    let table = parse_mtl("newmtl seat\nmap_Kd park bench.png\n", Path::new("benches"), &mut decoder);
    assert!(table.get("seat").unwrap().has_texture);
    assert_eq!(decoder.requested, vec![Path::new("benches").join("park bench.png")]);
}

#[test]
fn should_skip_texture_options_before_file_name() {
    assert_eq!(texture_file_name(" bark.jpg"), Some("bark.jpg"));
    assert_eq!(texture_file_name("-s 1 1 1 bark.jpg"), Some("bark.jpg"));
    assert_eq!(texture_file_name("-o 0.5 bark.jpg"), Some("bark.jpg"));
    assert_eq!(texture_file_name("-clamp on -mm 0 1 old oak.png"), Some("old oak.png"));
    assert_eq!(texture_file_name("-blendu off"), None);
    assert_eq!(texture_file_name("   "), None);
}
