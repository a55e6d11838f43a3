//! Collision-aware viewpoint movement.
//!
//! A step computes a desired position from the active [`MovementIntents`] and asks
//! [`MovementResolver::resolve`] where the viewpoint actually ends up. When the
//! full move is blocked the resolver tries each axis on its own: X and Z are both
//! tested from the starting position, then Y from wherever X/Z left the viewpoint.
//! The result is finally held above the floor.

use cgmath::{Point3, Vector3, Zero};

use crate::{
    camera::{Camera, Collision},
    data_structures::collider::ColliderSet,
};

/// Lowest eye height the resolver lets a viewpoint reach.
pub const DEFAULT_FLOOR: f32 = 1.0;

/// Directions requested for the current step. Opposite intents cancel out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementIntents {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementIntents {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    /// Sum of the unit vectors of every active intent, relative to `camera`.
    ///
    /// Forward follows the full view direction (including pitch); up and down follow
    /// the camera's own up vector.
    pub fn direction(&self, camera: &Camera) -> Vector3<f32> {
        let mut direction = Vector3::zero();
        let front = camera.front();
        let right = camera.right();
        let up = camera.up();
        if self.forward {
            direction += front;
        }
        if self.backward {
            direction -= front;
        }
        if self.right {
            direction += right;
        }
        if self.left {
            direction -= right;
        }
        if self.up {
            direction += up;
        }
        if self.down {
            direction -= up;
        }
        direction
    }
}

/// Moves a viewpoint through a borrowed set of colliders.
///
/// The resolver holds a plain reference, so the [`ColliderSet`] it was built from
/// must outlive it. Build one per step from whatever owns the colliders.
#[derive(Clone, Copy, Debug)]
pub struct MovementResolver<'w> {
    colliders: Option<&'w ColliderSet>,
    floor: f32,
}

impl<'w> MovementResolver<'w> {
    pub fn new(colliders: &'w ColliderSet, floor: f32) -> Self {
        Self {
            colliders: Some(colliders),
            floor,
        }
    }

    /// A resolver with no colliders at all. Only the floor applies.
    pub fn unbounded(floor: f32) -> Self {
        Self {
            colliders: None,
            floor,
        }
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// True iff `point` is inside any collider inflated by the collision radius.
    ///
    /// Always false while collision is disabled or there is nothing to collide with.
    pub fn is_blocked(&self, point: Point3<f32>, collision: &Collision) -> bool {
        if !collision.enabled {
            return false;
        }
        match self.colliders {
            Some(colliders) if !colliders.is_empty() => {
                colliders.any_collides(point, collision.radius)
            }
            _ => false,
        }
    }

    /// Where a viewpoint at `current` that wants to reach `desired` ends up.
    pub fn resolve(
        &self,
        current: Point3<f32>,
        desired: Point3<f32>,
        collision: &Collision,
    ) -> Point3<f32> {
        let mut resolved = if !self.is_blocked(desired, collision) {
            desired
        } else {
            let mut slid = current;

            let along_x = Point3::new(desired.x, current.y, current.z);
            if !self.is_blocked(along_x, collision) {
                slid.x = desired.x;
            }
            let along_z = Point3::new(current.x, current.y, desired.z);
            if !self.is_blocked(along_z, collision) {
                slid.z = desired.z;
            }
            let along_y = Point3::new(slid.x, desired.y, slid.z);
            if !self.is_blocked(along_y, collision) {
                slid.y = desired.y;
            }
            slid
        };

        if resolved.y < self.floor {
            resolved.y = self.floor;
        }
        resolved
    }

    /// Moves `camera` by `distance` along the summed direction of `intents`.
    ///
    /// Idle steps leave the camera untouched. Intents that cancel out still take a
    /// step of length zero, so the floor clamp applies to them.
    pub fn step(&self, camera: &mut Camera, intents: &MovementIntents, distance: f32) {
        if intents.is_idle() {
            return;
        }
        let direction = intents.direction(camera);
        let desired = camera.position + direction * distance;
        camera.position = self.resolve(camera.position, desired, &camera.collision);
    }
}
