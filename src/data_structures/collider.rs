//! Axis-aligned obstacle volumes.
//!
//! The scene's solid obstacles are a flat list of [`Aabb`]s wrapped in a
//! [`ColliderSet`]. The set is built once after the scene layout is known and is
//! read-only afterwards; queries are a linear scan.

use cgmath::{Point3, Vector3};

/// Axis-aligned bounding box defined by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with full edge lengths `size`.
    pub fn from_center_size(center: Point3<f32>, size: Vector3<f32>) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// This box grown by `radius` on every face.
    pub fn inflated(&self, radius: f32) -> Self {
        let margin = Vector3::new(radius, radius, radius);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Inclusive on all six faces.
    pub fn contains(&self, point: Point3<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// True iff `point` lies inside `aabb` inflated by `radius` (bounds inclusive).
pub fn collides(point: Point3<f32>, aabb: &Aabb, radius: f32) -> bool {
    aabb.inflated(radius).contains(point)
}

/// Immutable collection of obstacle boxes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColliderSet {
    boxes: Vec<Aabb>,
}

impl ColliderSet {
    pub fn new(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Aabb> {
        self.boxes.iter()
    }

    /// True iff any box, inflated by `radius`, contains `point`.
    pub fn any_collides(&self, point: Point3<f32>, radius: f32) -> bool {
        self.boxes.iter().any(|aabb| collides(point, aabb, radius))
    }
}

impl FromIterator<Aabb> for ColliderSet {
    fn from_iter<T: IntoIterator<Item = Aabb>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ColliderSet {
    type Item = &'a Aabb;
    type IntoIter = std::slice::Iter<'a, Aabb>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
