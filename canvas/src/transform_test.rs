#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{GameObject, ObjectKind};

const EPS: f64 = 1e-9;

fn assert_close(a: Point, b: Point) {
    assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS, "{a:?} != {b:?}");
}

fn object_at(x: f64, y: f64, rotation: f64) -> GameObject {
    let mut obj = GameObject::new(ObjectKind::Panel);
    obj.x = x;
    obj.y = y;
    obj.rotation = rotation;
    obj
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_arithmetic() {
    let a = Point::new(3.0, 4.0);
    let b = Point::new(1.0, 1.0);
    assert_eq!(a.sub(b), Point::new(2.0, 3.0));
    assert_eq!(a.add(b), Point::new(4.0, 5.0));
    assert_eq!(a.distance(Point::default()), 5.0);
}

// =============================================================
// rotate
// =============================================================

#[test]
fn rotate_quarter_turn_is_clockwise_on_screen() {
    // +x rotated 90° points down (+y) in screen coordinates.
    assert_close(rotate(Point::new(1.0, 0.0), 90.0), Point::new(0.0, 1.0));
}

#[test]
fn rotate_zero_is_identity() {
    assert_close(rotate(Point::new(7.0, -2.0), 0.0), Point::new(7.0, -2.0));
}

#[test]
fn rotate_full_turn_and_negative_match() {
    let p = Point::new(5.0, 3.0);
    assert_close(rotate(p, 360.0), p);
    assert_close(rotate(p, -90.0), rotate(p, 270.0));
    assert_close(rotate(p, 725.0), rotate(p, 5.0));
}

// =============================================================
// world_to_local / local_to_world
// =============================================================

#[test]
fn world_to_local_translates_then_unrotates() {
    let local = world_to_local(Point::new(100.0, 100.0), 90.0, Point::new(100.0, 150.0));
    assert_close(local, Point::new(50.0, 0.0));
}

#[test]
fn round_trip_for_many_angles() {
    let origin = Point::new(-40.0, 250.0);
    for deg in [-720.0, -450.0, -37.5, 0.0, 12.0, 90.0, 181.0, 359.9, 1000.0] {
        for p in [Point::new(0.0, 0.0), Point::new(13.0, -7.5), Point::new(-400.0, 900.0)] {
            let back = local_to_world(origin, deg, world_to_local(origin, deg, p));
            assert_close(back, p);
        }
    }
}

#[test]
fn object_round_trip_ignores_scale() {
    let mut obj = object_at(400.0, 300.0, 33.0);
    obj.scale_x = 3.0;
    obj.scale_y = 0.25;
    let p = Point::new(410.0, 280.0);
    let local = object_to_local(&obj, p);
    assert_close(object_to_world(&obj, local), p);

    let unscaled = object_at(400.0, 300.0, 33.0);
    assert_close(object_to_local(&unscaled, p), local);
}

#[test]
fn object_center_maps_to_local_origin() {
    let obj = object_at(12.0, 34.0, 123.0);
    assert_close(object_to_local(&obj, obj.center()), Point::default());
}
