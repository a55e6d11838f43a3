//! Engine data structures: models, colliders, textures, and instances.
//!
//! - `model` contains the vertex record, material groups and materials produced at load time
//! - `collider` holds the axis-aligned obstacle boxes used by the movement resolver
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds per-placement world transforms

pub mod collider;
pub mod instance;
pub mod model;
pub mod texture;
