//! Render pipelines. The scene is drawn by a single opaque pipeline.

pub mod basic;
