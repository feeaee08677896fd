//! Play session: one run of a scene with its scripts (test mode or exported player).
//!
//! The host drives the session with timestamps in milliseconds. Each frame
//! advances tweens, runs finished tween callbacks, calls the `update(dt)`
//! hook, then renders backdrop, objects, and the script overlay.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::rc::Rc;

use canvas::doc::{GameObject, ObjectId, Project, Sprite, SpriteId};
use canvas::render;
use canvas::surface::Surface;
use canvas::transform::Point;

use crate::live::LiveScene;
use crate::sandbox::{Sandbox, ScriptFault};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("project has no scene to play")]
    NoScene,
}

pub struct Session {
    scene: Rc<LiveScene>,
    sprites: Vec<Sprite>,
    sandbox: Sandbox,
    last_frame: Option<f64>,
    frames: u64,
    stopped: bool,
}

impl Session {
    /// Copy the current scene (the first one if none is current) and run every script once.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoScene`] if the project has no scenes.
    pub fn start(project: &Project, now: f64) -> Result<Self, SessionError> {
        let scene = project.current_scene().or_else(|| project.scenes.first()).ok_or(SessionError::NoScene)?;
        let live = Rc::new(LiveScene::from_scene(scene));
        let mut sandbox = Sandbox::new(Rc::clone(&live));
        sandbox.set_now(now);
        sandbox.load(&project.scripts);
        tracing::info!(
            scene = %scene.name,
            objects = live.len(),
            scripts = project.scripts.len(),
            faults = sandbox.faults().len(),
            "session started"
        );
        Ok(Self { scene: live, sprites: project.sprites.clone(), sandbox, last_frame: None, frames: 0, stopped: false })
    }

    /// Advance to `now` and draw one frame. A stopped session draws nothing.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface fails to draw.
    pub fn frame<S: Surface>(&mut self, now: f64, surface: &mut S) -> Result<(), S::Error> {
        if self.stopped {
            return Ok(());
        }
        let dt = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        self.last_frame = Some(now);
        self.sandbox.advance(now);
        self.sandbox.run_update(dt);
        self.frames += 1;
        self.render(surface)
    }

    fn render<S: Surface>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        let meta = self.scene.meta();
        let order = self.scene.draw_order();
        let sprite_ids: Vec<SpriteId> = order.iter().filter_map(|o| o.borrow().sprite).collect();
        render::request_assets(surface, meta, sprite_ids, &self.sprites)?;
        render::draw_backdrop(surface, meta)?;
        for obj in order {
            let obj = obj.borrow();
            if obj.visible {
                render::draw_object(surface, &obj, &self.sprites)?;
            }
        }
        for command in self.sandbox.take_overlay() {
            command.draw(surface)?;
        }
        Ok(())
    }

    /// Dispatch a click at `pt` to the topmost visible object with a handler.
    ///
    /// Returns the id of the object whose handler ran.
    pub fn click(&mut self, pt: Point) -> Option<ObjectId> {
        if self.stopped {
            return None;
        }
        let (id, handler) = self.scene.click_target(pt)?;
        tracing::debug!(%id, handler = %handler, "click");
        self.sandbox.call_handler(&handler);
        Some(id)
    }

    /// End the session. Later frames and clicks do nothing.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.sandbox.clear_tweens();
        tracing::info!(frames = self.frames, "session stopped");
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn faults(&self) -> &[ScriptFault] {
        self.sandbox.faults()
    }

    pub fn take_logs(&mut self) -> Vec<String> {
        self.sandbox.take_logs()
    }

    #[must_use]
    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    #[must_use]
    pub fn scene(&self) -> &LiveScene {
        &self.scene
    }

    /// Copy of the live state of one object.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<GameObject> {
        self.scene.get(id).map(|o| o.borrow().clone())
    }

    /// Copies of every live object, in storage order.
    #[must_use]
    pub fn objects(&self) -> Vec<GameObject> {
        self.scene.snapshot()
    }
}
