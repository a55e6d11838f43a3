use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let scene_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("scene.json"));
    promenade::flow::run(&scene_path)
}
