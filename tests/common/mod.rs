#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use promenade::resources::texture::TextureDecoder;
use tempfile::TempDir;

/// Scratch directory holding a mesh and whatever files it references.
pub struct AssetDir {
    dir: TempDir,
}

impl AssetDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `name` inside the directory and returns the full path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, contents).expect("failed to write asset");
        path
    }
}

/// Decoder that never touches the disk. Every requested path is recorded.
pub struct StubDecoder {
    pub requested: Vec<PathBuf>,
    fail: bool,
}

impl StubDecoder {
    pub fn succeeding() -> Self {
        Self {
            requested: Vec::new(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            requested: Vec::new(),
            fail: true,
        }
    }
}

impl TextureDecoder for StubDecoder {
    fn decode(&mut self, path: &Path) -> anyhow::Result<image::RgbaImage> {
        self.requested.push(path.to_path_buf());
        if self.fail {
            anyhow::bail!("no such image: {}", path.display());
        }
        Ok(image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 255])))
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(
            (a - e).abs() < 1e-5,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }
}
