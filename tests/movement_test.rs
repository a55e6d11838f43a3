use cgmath::{Deg, Point3};
use promenade::{
    camera::{Camera, Collision},
    data_structures::collider::{Aabb, ColliderSet},
    movement::{MovementIntents, MovementResolver},
};

mod common;
use common::assert_close;

fn point(p: Point3<f32>) -> [f32; 3] {
    [p.x, p.y, p.z]
}

fn no_radius() -> Collision {
    Collision {
        radius: 0.0,
        enabled: true,
    }
}

/// A wall on +X and a wall on +Z, both tall enough to block any height.
fn corner_walls() -> ColliderSet {
    ColliderSet::new(vec![
        Aabb::new(Point3::new(0.5, -10.0, -10.0), Point3::new(2.0, 10.0, 10.0)),
        Aabb::new(Point3::new(-10.0, -10.0, 0.5), Point3::new(10.0, 10.0, 2.0)),
    ])
}

#[test]
fn should_accept_unblocked_move() {
    let colliders = corner_walls();
    let resolver = MovementResolver::new(&colliders, 1.0);
    let resolved = resolver.resolve(
        Point3::new(-5.0, 5.0, -5.0),
        Point3::new(-4.0, 6.0, -4.0),
        &no_radius(),
    );
    assert_close(point(resolved), [-4.0, 6.0, -4.0]);
}

#[test]
fn should_keep_only_vertical_part_when_walls_block_both_horizontal_axes() {
    let colliders = corner_walls();
    let resolver = MovementResolver::new(&colliders, 1.0);
    let resolved = resolver.resolve(
        Point3::new(0.0, 5.0, 0.0),
        Point3::new(1.0, 6.0, 1.0),
        &no_radius(),
    );
    assert_close(point(resolved), [0.0, 6.0, 0.0]);
}

#[test]
fn should_slide_along_wall() {
    let colliders = ColliderSet::new(vec![Aabb::new(
        Point3::new(0.5, -10.0, -10.0),
        Point3::new(2.0, 10.0, 10.0),
    )]);
    let resolver = MovementResolver::new(&colliders, 1.0);
    let resolved = resolver.resolve(
        Point3::new(0.0, 5.0, 0.0),
        Point3::new(1.0, 5.0, 1.0),
        &no_radius(),
    );
    assert_close(point(resolved), [0.0, 5.0, 1.0]);
}

#[test]
fn should_respect_collision_radius() {
    let colliders = ColliderSet::new(vec![Aabb::new(
        Point3::new(2.0, -10.0, -10.0),
        Point3::new(3.0, 10.0, 10.0),
    )]);
    let resolver = MovementResolver::new(&colliders, 1.0);
    let collision = Collision {
        radius: 1.0,
        enabled: true,
    };
    let resolved = resolver.resolve(Point3::new(0.0, 5.0, 0.0), Point3::new(1.5, 5.0, 0.0), &collision);
    assert_close(point(resolved), [0.0, 5.0, 0.0]);
}

#[test]
fn should_accept_any_move_when_collision_disabled() {
    let colliders = corner_walls();
    let resolver = MovementResolver::new(&colliders, 1.0);
    let collision = Collision {
        radius: 0.0,
        enabled: false,
    };
    let resolved = resolver.resolve(Point3::new(0.0, 5.0, 0.0), Point3::new(1.0, 6.0, 1.0), &collision);
    assert_close(point(resolved), [1.0, 6.0, 1.0]);
}

#[test]
fn should_accept_any_move_without_colliders() {
    let empty = ColliderSet::default();
    for resolver in [MovementResolver::new(&empty, 1.0), MovementResolver::unbounded(1.0)] {
        let resolved = resolver.resolve(
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(3.0, 4.0, -3.0),
            &no_radius(),
        );
        assert_close(point(resolved), [3.0, 4.0, -3.0]);
    }
}

#[test]
fn should_clamp_to_floor_even_without_colliders() {
    let resolver = MovementResolver::unbounded(1.0);
    let resolved = resolver.resolve(
        Point3::new(0.0, 1.5, 0.0),
        Point3::new(0.0, -3.0, 2.0),
        &no_radius(),
    );
    assert_close(point(resolved), [0.0, 1.0, 2.0]);
}

#[test]
fn should_not_move_on_idle_step() {
    let resolver = MovementResolver::unbounded(1.0);
    let mut camera = Camera::new(Point3::<f32>::new(0.0, 5.0, 0.0), Deg(-90.0_f32), Deg(0.0_f32));
    resolver.step(&mut camera, &MovementIntents::default(), 10.0);
    assert_close(point(camera.position), [0.0, 5.0, 0.0]);
}

#[test]
fn should_step_forward_along_view_direction() {
    let resolver = MovementResolver::unbounded(1.0);
    // Yaw -90 looks down -Z
    let mut camera = Camera::new(Point3::<f32>::new(0.0, 5.0, 0.0), Deg(-90.0_f32), Deg(0.0_f32));
    let intents = MovementIntents {
        forward: true,
        ..Default::default()
    };
    resolver.step(&mut camera, &intents, 2.0);
    assert_close(point(camera.position), [0.0, 5.0, -2.0]);
}

#[test]
fn should_cancel_opposite_intents() {
    let resolver = MovementResolver::unbounded(1.0);
    let mut camera = Camera::new(Point3::<f32>::new(0.0, 5.0, 0.0), Deg(-90.0_f32), Deg(0.0_f32));
    let intents = MovementIntents {
        left: true,
        right: true,
        ..Default::default()
    };
    resolver.step(&mut camera, &intents, 2.0);
    assert_close(point(camera.position), [0.0, 5.0, 0.0]);
}

#[test]
fn should_stop_step_at_obstacle() {
    let colliders = ColliderSet::new(vec![Aabb::new(
        Point3::new(-5.0, 0.0, -4.0),
        Point3::new(5.0, 10.0, -3.0),
    )]);
    let resolver = MovementResolver::new(&colliders, 1.0);
    let mut camera = Camera::new(Point3::<f32>::new(0.0, 5.0, 0.0), Deg(-90.0_f32), Deg(0.0_f32));
    camera.collision = Collision {
        radius: 1.0,
        enabled: true,
    };
    let intents = MovementIntents {
        forward: true,
        ..Default::default()
    };
    resolver.step(&mut camera, &intents, 1.5);
    assert_close(point(camera.position), [0.0, 5.0, -1.5]);
    resolver.step(&mut camera, &intents, 1.5);
    assert_close(point(camera.position), [0.0, 5.0, -1.5]);
}

fn small_box(center: [f32; 3]) -> Aabb {
    let [x, y, z] = center;
    Aabb::new(
        Point3::new(x - 0.25, y - 0.5, z - 0.25),
        Point3::new(x + 0.25, y + 0.5, z + 0.25),
    )
}

/// Blocks the full move to (1, 6, 1) and the Z-only move to (0, 5, 1) while the
/// X-only move to (1, 5, 0) stays clear.
fn blocked_except_x() -> Vec<Aabb> {
    vec![
        Aabb::new(Point3::new(-0.25, -10.0, 0.5), Point3::new(0.25, 10.0, 2.0)),
        small_box([1.0, 6.0, 1.0]),
    ]
}

#[test]
fn should_test_vertical_slide_from_slid_position() {
    let mut boxes = blocked_except_x();
    // Blocks rising straight up from the start, not from the slid position
    boxes.push(small_box([0.0, 6.0, 0.0]));
    let colliders = ColliderSet::new(boxes);
    let resolver = MovementResolver::new(&colliders, 1.0);

    let resolved = resolver.resolve(
        Point3::new(0.0, 5.0, 0.0),
        Point3::new(1.0, 6.0, 1.0),
        &no_radius(),
    );
    assert_close(point(resolved), [1.0, 6.0, 0.0]);
}

#[test]
fn should_keep_height_when_slid_position_is_blocked_above() {
    let mut boxes = blocked_except_x();
    // Blocks rising from the slid position only
    boxes.push(small_box([1.0, 6.0, 0.0]));
    let colliders = ColliderSet::new(boxes);
    let resolver = MovementResolver::new(&colliders, 1.0);

    let resolved = resolver.resolve(
        Point3::new(0.0, 5.0, 0.0),
        Point3::new(1.0, 6.0, 1.0),
        &no_radius(),
    );
    assert_close(point(resolved), [1.0, 5.0, 0.0]);
}

#[test]
fn should_clamp_to_floor_when_intents_cancel() {
    let resolver = MovementResolver::unbounded(1.0);
    let mut camera = Camera::new(Point3::<f32>::new(2.0, 0.5, 3.0), Deg(-90.0_f32), Deg(0.0_f32));
    let intents = MovementIntents {
        forward: true,
        backward: true,
        ..Default::default()
    };
    resolver.step(&mut camera, &intents, 2.0);
    assert_close(point(camera.position), [2.0, 1.0, 3.0]);
}
