//! Live scene: the mutable copy of a scene a session plays.
//!
//! Each object sits behind its own `Rc<RefCell<..>>` so script handles, the
//! tween runtime, and the renderer all read and write the same record.
//! Borrows are short and never span a script call.

#[cfg(test)]
#[path = "live_test.rs"]
mod live_test;

use std::cell::RefCell;
use std::rc::Rc;

use canvas::doc::{GameObject, ObjectId, Scene};
use canvas::hit;
use canvas::layer;
use canvas::transform::Point;

/// Shared handle to one live object.
pub type LiveObject = Rc<RefCell<GameObject>>;

/// A deep copy of a scene whose objects are individually shared.
#[derive(Debug)]
pub struct LiveScene {
    /// Scene metadata; `objects` is always empty here.
    meta: Scene,
    objects: Vec<LiveObject>,
}

impl LiveScene {
    /// Copy `scene` so playback never touches the authored document.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let objects = scene.objects.iter().map(|o| Rc::new(RefCell::new(o.clone()))).collect();
        let meta = Scene { objects: Vec::new(), ..scene.clone() };
        Self { meta, objects }
    }

    #[must_use]
    pub fn meta(&self) -> &Scene {
        &self.meta
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<LiveObject> {
        self.objects.iter().find(|o| o.borrow().id == *id).cloned()
    }

    /// First object whose name matches exactly.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<LiveObject> {
        self.objects.iter().find(|o| o.borrow().name == name).cloned()
    }

    /// Ids in storage order.
    #[must_use]
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.borrow().id).collect()
    }

    /// Objects back to front.
    #[must_use]
    pub fn draw_order(&self) -> Vec<LiveObject> {
        let layers: Vec<i64> = self.objects.iter().map(|o| o.borrow().layer).collect();
        layer::order_indices(&layers).into_iter().map(|i| Rc::clone(&self.objects[i])).collect()
    }

    /// Objects front to back.
    #[must_use]
    pub fn hit_order(&self) -> Vec<LiveObject> {
        let mut order = self.draw_order();
        order.reverse();
        order
    }

    /// Topmost visible object under `pt` that has a click handler, with the handler name.
    ///
    /// Objects without a handler let the click through to whatever is below.
    #[must_use]
    pub fn click_target(&self, pt: Point) -> Option<(ObjectId, String)> {
        self.hit_order().into_iter().find_map(|o| {
            let obj = o.borrow();
            if !obj.visible || !hit::point_in_body(&obj, pt) {
                return None;
            }
            let handler = obj.on_click.as_deref().map(str::trim).filter(|h| !h.is_empty())?;
            Some((obj.id, handler.to_owned()))
        })
    }

    /// Plain copies of every object, in storage order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<GameObject> {
        self.objects.iter().map(|o| o.borrow().clone()).collect()
    }
}
