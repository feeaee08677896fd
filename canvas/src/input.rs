//! Input model: UI state and the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. Every active variant carries a [`Snapshot`] of the object as
//! it was when the gesture started; moves and resizes also keep the pointer's
//! start position. Each pointer-move recomputes the object's geometry from
//! that snapshot and the total displacement, never from the previous move.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{MIN_OBJECT_SIZE, ROTATE_BEARING_OFFSET_DEG};
use crate::doc::{GameObject, ObjectId};
use crate::hit::{Corner, HitPart};
use crate::transform::{Point, local_to_world, rotate};

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected object, if any.
    pub selected_id: Option<ObjectId>,
    /// Cursor most recently requested from the host.
    pub cursor: Cursor,
}

/// Pointer affordance requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Crosshair,
    Move,
    Resize(Corner),
    Grab,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Crosshair => "crosshair",
            Self::Move => "move",
            Self::Resize(Corner::Tl) => "nw-resize",
            Self::Resize(Corner::Tr) => "ne-resize",
            Self::Resize(Corner::Bl) => "sw-resize",
            Self::Resize(Corner::Br) => "se-resize",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }

    /// Hover feedback for a classification under the pointer.
    #[must_use]
    pub fn for_hover(part: Option<HitPart>) -> Self {
        match part {
            None => Self::Crosshair,
            Some(HitPart::Body) => Self::Move,
            Some(HitPart::Resize(corner)) => Self::Resize(corner),
            Some(HitPart::Rotate) => Self::Grab,
        }
    }
}

/// Object geometry captured when a gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Snapshot {
    #[must_use]
    pub fn of(obj: &GameObject) -> Self {
        Self { x: obj.x, y: obj.y, width: obj.width, height: obj.height, rotation: obj.rotation }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an object by its body.
    Moving {
        id: ObjectId,
        /// World-space pointer position at pointer-down.
        start: Point,
        snapshot: Snapshot,
    },
    /// The user is dragging one of the four corner handles.
    Resizing {
        id: ObjectId,
        corner: Corner,
        /// World-space pointer position at pointer-down.
        start: Point,
        snapshot: Snapshot,
    },
    /// The user is dragging the rotate handle. The new angle depends only on
    /// the pointer's bearing from the snapshot center.
    Rotating { id: ObjectId, snapshot: Snapshot },
}

impl InputState {
    /// Enter the gesture that a pointer-down on `part` of `obj` starts.
    #[must_use]
    pub fn begin(obj: &GameObject, part: HitPart, start: Point) -> Self {
        let snapshot = Snapshot::of(obj);
        let id = obj.id;
        match part {
            HitPart::Body => Self::Moving { id, start, snapshot },
            HitPart::Resize(corner) => Self::Resizing { id, corner, start, snapshot },
            HitPart::Rotate => Self::Rotating { id, snapshot },
        }
    }

    /// The object the active gesture manipulates.
    #[must_use]
    pub fn target(&self) -> Option<ObjectId> {
        match self {
            Self::Idle => None,
            Self::Moving { id, .. } | Self::Resizing { id, .. } | Self::Rotating { id, .. } => Some(*id),
        }
    }

    /// Cursor for the active gesture, independent of what is hovered.
    #[must_use]
    pub fn cursor(&self) -> Option<Cursor> {
        match self {
            Self::Idle => None,
            Self::Moving { .. } => Some(Cursor::Move),
            Self::Resizing { corner, .. } => Some(Cursor::Resize(*corner)),
            Self::Rotating { .. } => Some(Cursor::Grabbing),
        }
    }

    /// Geometry the target should have with the pointer at `current`.
    #[must_use]
    pub fn update(&self, current: Point) -> Option<(ObjectId, Geometry)> {
        match *self {
            Self::Idle => None,
            Self::Moving { id, start, snapshot } => Some((id, move_geometry(&snapshot, start, current))),
            Self::Resizing { id, corner, start, snapshot } => {
                Some((id, resize_geometry(&snapshot, corner, start, current)))
            }
            Self::Rotating { id, snapshot } => Some((id, rotate_geometry(&snapshot, current))),
        }
    }
}

/// Resulting position, size, and rotation of a gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl From<Snapshot> for Geometry {
    fn from(s: Snapshot) -> Self {
        Self { x: s.x, y: s.y, width: s.width, height: s.height, rotation: s.rotation }
    }
}

/// Snapshot position plus the raw world-space pointer delta.
#[must_use]
pub fn move_geometry(snapshot: &Snapshot, start: Point, current: Point) -> Geometry {
    let delta = current.sub(start);
    Geometry { x: snapshot.x + delta.x, y: snapshot.y + delta.y, ..Geometry::from(*snapshot) }
}

/// Bearing from the snapshot center to the pointer, with "up" as 0°, rounded to whole degrees.
#[must_use]
pub fn rotate_geometry(snapshot: &Snapshot, current: Point) -> Geometry {
    let d = current.sub(snapshot.center());
    let rotation = (d.y.atan2(d.x).to_degrees() + ROTATE_BEARING_OFFSET_DEG).round();
    Geometry { rotation, ..Geometry::from(*snapshot) }
}

/// Resize along the object's own axes, keeping the opposite corner fixed in world space.
///
/// The pointer delta is rotated into the snapshot's local frame. Width and
/// height are floored at [`MIN_OBJECT_SIZE`], and the center is recomputed from
/// the fixed corner so clamping never drags it.
#[must_use]
pub fn resize_geometry(snapshot: &Snapshot, corner: Corner, start: Point, current: Point) -> Geometry {
    let local_delta = rotate(current.sub(start), -snapshot.rotation);
    let (sx, sy) = corner.signs();

    let width = (snapshot.width + sx * local_delta.x).max(MIN_OBJECT_SIZE);
    let height = (snapshot.height + sy * local_delta.y).max(MIN_OBJECT_SIZE);

    let anchor_local = corner.opposite().local_point(snapshot.width, snapshot.height);
    let anchor = local_to_world(snapshot.center(), snapshot.rotation, anchor_local);
    let center = local_to_world(anchor, snapshot.rotation, Point::new(sx * width / 2.0, sy * height / 2.0));

    Geometry { x: center.x, y: center.y, width, height, rotation: snapshot.rotation }
}
