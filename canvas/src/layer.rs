//! Z-order resolution over a scene's objects.
//!
//! Draw order is a stable sort by `layer` ascending, so equal layers keep
//! their insertion order. Hit order is the exact reverse: whatever is drawn
//! last is probed first.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use crate::doc::{GameObject, ObjectId};

/// Direction for a layer reorder command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reorder {
    /// One step toward the front.
    Up,
    /// One step toward the back.
    Down,
    /// In front of everything.
    Top,
    /// Behind everything.
    Bottom,
}

/// Indices into `objects` in back-to-front order.
#[must_use]
pub fn draw_indices(objects: &[GameObject]) -> Vec<usize> {
    let layers: Vec<i64> = objects.iter().map(|o| o.layer).collect();
    order_indices(&layers)
}

/// Back-to-front indices for a plain list of layer values.
#[must_use]
pub fn order_indices(layers: &[i64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..layers.len()).collect();
    idx.sort_by_key(|&i| layers[i]);
    idx
}

/// Objects in back-to-front order (render order).
#[must_use]
pub fn draw_order(objects: &[GameObject]) -> Vec<&GameObject> {
    draw_indices(objects).into_iter().map(|i| &objects[i]).collect()
}

/// Objects in front-to-back order (hit-test probing order).
#[must_use]
pub fn hit_order(objects: &[GameObject]) -> Vec<&GameObject> {
    draw_indices(objects).into_iter().rev().map(|i| &objects[i]).collect()
}

/// Reassign layers so `id` moves in the given direction.
///
/// `Top`/`Bottom` place the object one past the current extreme. `Up`/`Down`
/// take the neighbor's layer ±1 and push any colliding objects further out so
/// the move is exactly one step. Returns `false` if `id` is not present.
pub fn reorder(objects: &mut [GameObject], id: &ObjectId, direction: Reorder) -> bool {
    let order = draw_indices(objects);
    let Some(pos) = order.iter().position(|&i| objects[i].id == *id) else {
        return false;
    };
    let moved = order[pos];

    match direction {
        Reorder::Top => {
            let max = objects.iter().map(|o| o.layer).max().unwrap_or(0);
            objects[moved].layer = max + 1;
        }
        Reorder::Bottom => {
            let min = objects.iter().map(|o| o.layer).min().unwrap_or(0);
            objects[moved].layer = min - 1;
        }
        Reorder::Up => {
            if pos + 1 >= order.len() {
                return true;
            }
            let mut desired = order.clone();
            desired.swap(pos, pos + 1);

            let mut floor = objects[desired[pos]].layer + 1;
            objects[moved].layer = floor;
            for &j in &desired[pos + 2..] {
                if objects[j].layer <= floor {
                    objects[j].layer = floor + 1;
                }
                floor = objects[j].layer;
            }
        }
        Reorder::Down => {
            if pos == 0 {
                return true;
            }
            let mut desired = order.clone();
            desired.swap(pos - 1, pos);

            let mut ceiling = objects[desired[pos]].layer - 1;
            objects[moved].layer = ceiling;
            for &j in desired[..pos - 1].iter().rev() {
                if objects[j].layer >= ceiling {
                    objects[j].layer = ceiling - 1;
                }
                ceiling = objects[j].layer;
            }
        }
    }
    true
}
