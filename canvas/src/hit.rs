//! Hit-testing: which object, and which part of it, lies under a world point.
//!
//! Classification happens in the object's local frame (see
//! [`crate::transform`]). Handles always win over the body, and the selected
//! object is probed before anything else so its handles stay grabbable even
//! where another object's body overlaps them.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_SIZE, ROTATE_HANDLE_OFFSET, ROTATE_HANDLE_TOLERANCE};
use crate::doc::{GameObject, ObjectId, Scene};
use crate::layer;
use crate::transform::{Point, object_to_local};

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Resize(Corner),
    Rotate,
}

/// A corner resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Tl,
    Tr,
    Bl,
    Br,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Tl, Corner::Tr, Corner::Bl, Corner::Br];

    /// Signed unit factors `(sx, sy)` locating this corner relative to the center.
    #[must_use]
    pub fn signs(self) -> (f64, f64) {
        match self {
            Self::Tl => (-1.0, -1.0),
            Self::Tr => (1.0, -1.0),
            Self::Bl => (-1.0, 1.0),
            Self::Br => (1.0, 1.0),
        }
    }

    /// Local position of this corner for an object of the given size.
    #[must_use]
    pub fn local_point(self, width: f64, height: f64) -> Point {
        let (sx, sy) = self.signs();
        Point::new(sx * width / 2.0, sy * height / 2.0)
    }

    /// The diagonally opposite corner.
    #[must_use]
    pub fn opposite(self) -> Corner {
        match self {
            Self::Tl => Self::Br,
            Self::Tr => Self::Bl,
            Self::Bl => Self::Tr,
            Self::Br => Self::Tl,
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Local position of the rotate handle for an object of the given height.
#[must_use]
pub fn rotate_handle_local(height: f64) -> Point {
    Point::new(0.0, -(height / 2.0 + ROTATE_HANDLE_OFFSET))
}

/// Classify `world_pt` against a single object, ignoring visibility.
#[must_use]
pub fn classify(obj: &GameObject, world_pt: Point) -> Option<HitPart> {
    let local = object_to_local(obj, world_pt);

    if local.distance(rotate_handle_local(obj.height)) <= ROTATE_HANDLE_TOLERANCE {
        return Some(HitPart::Rotate);
    }

    // Nearest corner within tolerance; small objects can put several in reach.
    let corner = Corner::ALL
        .into_iter()
        .map(|corner| (corner, corner.local_point(obj.width, obj.height)))
        .filter(|(_, c)| (local.x - c.x).abs() <= HANDLE_SIZE && (local.y - c.y).abs() <= HANDLE_SIZE)
        .min_by(|(_, a), (_, b)| local.distance(*a).total_cmp(&local.distance(*b)));
    if let Some((corner, _)) = corner {
        return Some(HitPart::Resize(corner));
    }

    if body_contains(obj, local) {
        return Some(HitPart::Body);
    }
    None
}

/// Whether a local-space point lies inside the object's unscaled body.
#[must_use]
pub fn body_contains(obj: &GameObject, local: Point) -> bool {
    local.x.abs() <= obj.width / 2.0 && local.y.abs() <= obj.height / 2.0
}

/// Whether a world point lies inside the object's body (no handles).
#[must_use]
pub fn point_in_body(obj: &GameObject, world_pt: Point) -> bool {
    body_contains(obj, object_to_local(obj, world_pt))
}

/// Test which visible object (if any) is under `world_pt`.
///
/// The selected object is classified first; the rest are probed from the
/// topmost layer down and the first hit wins.
#[must_use]
pub fn hit_test(scene: &Scene, world_pt: Point, selected_id: Option<ObjectId>) -> Option<Hit> {
    if let Some(sel) = selected_id.and_then(|id| scene.object(&id)) {
        if sel.visible {
            if let Some(part) = classify(sel, world_pt) {
                return Some(Hit { object_id: sel.id, part });
            }
        }
    }

    layer::hit_order(&scene.objects)
        .into_iter()
        .filter(|o| o.visible && Some(o.id) != selected_id)
        .find_map(|o| classify(o, world_pt).map(|part| Hit { object_id: o.id, part }))
}
