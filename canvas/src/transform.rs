//! Local/world coordinate conversion for rotated objects.
//!
//! An object's local space is centered on its position and unrotated. Scale
//! never participates: hit geometry and handle placement are defined in
//! local, pre-scale units, while scale only affects the rendered extent.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::doc::GameObject;

/// A point in either world or object-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Component-wise sum `self + other`.
    #[must_use]
    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rotate a vector about the origin by `degrees` (clockwise in screen space).
#[must_use]
pub fn rotate(v: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Convert a world point into the local frame of a pose at `origin` rotated by `rotation` degrees.
#[must_use]
pub fn world_to_local(origin: Point, rotation: f64, world: Point) -> Point {
    rotate(world.sub(origin), -rotation)
}

/// Convert a local point of a pose at `origin` rotated by `rotation` degrees into world space.
#[must_use]
pub fn local_to_world(origin: Point, rotation: f64, local: Point) -> Point {
    rotate(local, rotation).add(origin)
}

/// World → local for a game object.
#[must_use]
pub fn object_to_local(obj: &GameObject, world: Point) -> Point {
    world_to_local(obj.center(), obj.rotation, world)
}

/// Local → world for a game object.
#[must_use]
pub fn object_to_world(obj: &GameObject, local: Point) -> Point {
    local_to_world(obj.center(), obj.rotation, local)
}
