//! Data-driven scene description.
//!
//! The layout of the park (which meshes exist, where each copy stands, and which
//! boxes block the viewpoint) lives in a JSON file rather than in code. Every field
//! has a default, so an empty object `{}` is a valid, if empty, scene.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    camera::{Camera, Collision},
    data_structures::{
        collider::{Aabb, ColliderSet},
        instance::Instance,
    },
    movement::DEFAULT_FLOOR,
    render::GroupFilter,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Promenade".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Starting viewpoint and input tuning. Angles are in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 15.0],
            yaw: -90.0,
            pitch: -20.0,
            speed: 5.0,
            sensitivity: 0.1,
            fov: 45.0,
            znear: 0.1,
            zfar: 500.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub radius: f32,
    pub enabled: bool,
    pub floor: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        let collision = Collision::default();
        Self {
            radius: collision.radius,
            enabled: collision.enabled,
            floor: DEFAULT_FLOOR,
        }
    }
}

/// Either one factor for all axes or one per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f32),
    PerAxis([f32; 3]),
}

impl Scale {
    pub fn to_array(self) -> [f32; 3] {
        match self {
            Scale::Uniform(s) => [s, s, s],
            Scale::PerAxis(axes) => axes,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Uniform(1.0)
    }
}

/// One copy of an asset in the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub asset: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default)]
    pub groups: GroupFilter,
}

impl Placement {
    pub fn instance(&self) -> Instance {
        Instance::from_placement(self.position, self.yaw_degrees, self.scale.to_array())
    }
}

/// An obstacle box, written either by centre and full size or by its corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColliderSpec {
    CenterSize { center: [f32; 3], size: [f32; 3] },
    Corners { min: [f32; 3], max: [f32; 3] },
}

impl ColliderSpec {
    pub fn to_aabb(&self) -> Aabb {
        match *self {
            ColliderSpec::CenterSize { center, size } => {
                Aabb::from_center_size(center.into(), size.into())
            }
            ColliderSpec::Corners { min, max } => Aabb::new(min.into(), max.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub collision: CollisionConfig,
    pub clear_colour: [f32; 3],
    pub fog_colour: [f32; 3],
    pub fog_density: f32,
    /// Asset id to mesh path, relative to the config file.
    pub assets: BTreeMap<String, PathBuf>,
    pub placements: Vec<Placement>,
    pub colliders: Vec<ColliderSpec>,
    /// Directory the config was read from. Asset paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            collision: CollisionConfig::default(),
            clear_colour: [0.1, 0.1, 0.15],
            fog_colour: [0.2, 0.2, 0.25],
            fog_density: 0.004,
            assets: BTreeMap::new(),
            placements: Vec::new(),
            colliders: Vec::new(),
            base_dir: PathBuf::new(),
        }
    }
}

impl SceneConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scene config {}", path.display()))?;
        let mut config = Self::from_json(&text)
            .with_context(|| format!("failed to parse scene config {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        log::info!(
            "Scene {}: {} assets, {} placements, {} colliders.",
            path.display(),
            config.assets.len(),
            config.placements.len(),
            config.colliders.len()
        );
        Ok(config)
    }

    pub fn asset_path(&self, asset: &str) -> Option<PathBuf> {
        self.assets.get(asset).map(|path| self.base_dir.join(path))
    }

    pub fn colliders(&self) -> ColliderSet {
        self.colliders.iter().map(ColliderSpec::to_aabb).collect()
    }

    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new(
            self.camera.position,
            cgmath::Deg(self.camera.yaw),
            cgmath::Deg(self.camera.pitch),
        );
        camera.collision = Collision {
            radius: self.collision.radius,
            enabled: self.collision.enabled,
        };
        camera
    }

    /// Placements grouped by `(asset, groups)` in first-seen order, so each group can
    /// be drawn with one instanced call.
    pub fn batches(&self) -> Vec<PlacementBatch> {
        let mut batches: Vec<PlacementBatch> = Vec::new();
        for placement in self.placements.iter() {
            let instance = placement.instance();
            match batches
                .iter_mut()
                .find(|b| b.asset == placement.asset && b.groups == placement.groups)
            {
                Some(batch) => batch.instances.push(instance),
                None => batches.push(PlacementBatch {
                    asset: placement.asset.clone(),
                    groups: placement.groups.clone(),
                    instances: vec![instance],
                }),
            }
        }
        batches
    }
}

/// Every placement of one asset drawn with the same group filter.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementBatch {
    pub asset: String,
    pub groups: GroupFilter,
    pub instances: Vec<Instance>,
}
