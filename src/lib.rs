//! promenade
//!
//! A small first-person walkthrough of an evening park. Meshes and their material
//! libraries are read from Wavefront OBJ/MTL text, expanded into per-material
//! triangle batches and drawn with wgpu; the viewpoint slides along axis-aligned
//! obstacle boxes instead of passing through them.
//!
//! High-level modules
//! - `error`: typed errors for asset ingestion
//! - `data_structures`: vertex records, materials, models, colliders, instances, textures
//! - `resources`: OBJ and MTL parsing, texture decoding and GPU upload
//! - `camera`: viewpoint state, input controller, projection and uniforms
//! - `movement`: collision queries and axis-by-axis sliding
//! - `scene`: the JSON scene description (assets, placements, colliders)
//! - `context`: central GPU and window context that owns device/queue/pipeline
//! - `pipelines`: the scene render pipeline
//! - `render`: per-group appearance, group filters and instanced draws
//! - `flow`: the world, winit event loop and `run`
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod movement;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Point3, Vector3};
pub use error::{LoadError, TokenError};
