use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::doc::{DocError, GameObject, ObjectId, ObjectKind, ObjectPatch, Project, SceneId, ScenePatch};
use crate::hit::{self, Hit};
use crate::input::{Cursor, Geometry, InputState, UiState};
use crate::layer::Reorder;
use crate::render;
use crate::surface::Surface;
use crate::transform::Point;
use crate::web::WebSurface;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectionChanged(Option<ObjectId>),
    ObjectUpdated { id: ObjectId, patch: ObjectPatch },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub project: Project,
    pub ui: UiState,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing project, e.g. one imported from a snapshot.
    #[must_use]
    pub fn with_project(project: Project) -> Self {
        Self { project, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the whole project. Selection and any gesture are dropped.
    pub fn load_project(&mut self, project: Project) {
        self.project = project;
        self.ui.selected_id = None;
        self.input = InputState::Idle;
    }

    /// Add a scene; it only becomes current if there was none.
    pub fn add_scene(&mut self, name: impl Into<String>) -> SceneId {
        self.project.add_scene(name)
    }

    /// # Errors
    ///
    /// Returns `SceneNotFound` for an unknown scene.
    pub fn update_scene(&mut self, id: &SceneId, patch: &ScenePatch) -> Result<(), DocError> {
        self.project.update_scene(id, patch)
    }

    /// Delete a scene. Switching away from the current scene clears the selection.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` for an unknown scene.
    pub fn delete_scene(&mut self, id: &SceneId) -> Result<(), DocError> {
        let was_current = self.project.current_scene_id() == Some(*id);
        self.project.delete_scene(id)?;
        if was_current {
            self.clear_selection();
        }
        Ok(())
    }

    /// Switch scenes. The selection belongs to the old scene and is cleared.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` for an unknown scene.
    pub fn set_current_scene(&mut self, id: &SceneId) -> Result<(), DocError> {
        self.project.set_current_scene(id)?;
        self.clear_selection();
        Ok(())
    }

    /// Create an object of `kind` on top of the current scene.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` if there is no scene to add to.
    pub fn create_object(&mut self, kind: ObjectKind) -> Result<ObjectId, DocError> {
        self.project.create_object(kind)
    }

    /// Apply a partial update to an object of the current scene.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` or `ObjectNotFound`.
    pub fn update_object(&mut self, id: &ObjectId, patch: &ObjectPatch) -> Result<Action, DocError> {
        self.project.update_object(id, patch)?;
        Ok(Action::ObjectUpdated { id: *id, patch: patch.clone() })
    }

    /// Delete an object. Deleting the selected object clears the selection.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` or `ObjectNotFound`.
    pub fn delete_object(&mut self, id: &ObjectId) -> Result<GameObject, DocError> {
        let removed = self.project.delete_object(id)?;
        if self.ui.selected_id == Some(*id) {
            self.clear_selection();
        }
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `NoCurrentScene` or `ObjectNotFound`.
    pub fn reorder_object(&mut self, id: &ObjectId, direction: Reorder) -> Result<(), DocError> {
        self.project.reorder_object(id, direction)
    }

    /// Select an object of the current scene, or deselect with `None`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` if `id` is not in the current scene.
    pub fn select(&mut self, id: Option<ObjectId>) -> Result<Vec<Action>, DocError> {
        if let Some(id) = id {
            if self.project.object(&id).is_none() {
                return Err(DocError::ObjectNotFound(id));
            }
        }
        let mut actions = Vec::new();
        if self.ui.selected_id != id {
            self.ui.selected_id = id;
            actions.push(Action::SelectionChanged(id));
            actions.push(Action::RenderNeeded);
        }
        Ok(actions)
    }

    fn clear_selection(&mut self) {
        self.ui.selected_id = None;
        self.input = InputState::Idle;
    }

    // --- Pointer input ---

    /// Primary pointer pressed at a world point: select what is under it and
    /// start a gesture. Hosts forward only primary-button presses.
    pub fn on_pointer_down(&mut self, world_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let hit = self
            .project
            .current_scene()
            .and_then(|scene| hit::hit_test(scene, world_pt, self.ui.selected_id));

        let Some(Hit { object_id, part }) = hit else {
            self.input = InputState::Idle;
            if self.ui.selected_id.take().is_some() {
                actions.push(Action::SelectionChanged(None));
                actions.push(Action::RenderNeeded);
            }
            self.push_cursor(Cursor::Crosshair, &mut actions);
            return actions;
        };

        if self.ui.selected_id != Some(object_id) {
            self.ui.selected_id = Some(object_id);
            actions.push(Action::SelectionChanged(Some(object_id)));
            actions.push(Action::RenderNeeded);
        }
        if let Some(obj) = self.project.object(&object_id) {
            self.input = InputState::begin(obj, part, world_pt);
        }
        if let Some(cursor) = self.input.cursor() {
            self.push_cursor(cursor, &mut actions);
        }
        actions
    }

    /// Pointer moved: advance the active gesture, or update hover feedback when idle.
    pub fn on_pointer_move(&mut self, world_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some((id, geometry)) = self.input.update(world_pt) else {
            let cursor = Cursor::for_hover(self.hover_part(world_pt));
            self.push_cursor(cursor, &mut actions);
            return actions;
        };

        let patch = geometry_patch(geometry);
        match self.project.update_object(&id, &patch) {
            Ok(()) => {
                actions.push(Action::ObjectUpdated { id, patch });
                actions.push(Action::RenderNeeded);
            }
            Err(e) => {
                tracing::debug!(error = %e, "gesture target vanished");
                self.input = InputState::Idle;
            }
        }
        actions
    }

    /// Pointer released: end the gesture and fall back to hover feedback.
    pub fn on_pointer_up(&mut self, world_pt: Point) -> Vec<Action> {
        self.input = InputState::Idle;
        let mut actions = Vec::new();
        let cursor = Cursor::for_hover(self.hover_part(world_pt));
        self.push_cursor(cursor, &mut actions);
        actions
    }

    /// Pointer left the canvas: abandon the gesture where it is.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        let mut actions = Vec::new();
        self.push_cursor(Cursor::Crosshair, &mut actions);
        actions
    }

    fn hover_part(&self, world_pt: Point) -> Option<hit::HitPart> {
        let scene = self.project.current_scene()?;
        hit::hit_test(scene, world_pt, self.ui.selected_id).map(|h| h.part)
    }

    fn push_cursor(&mut self, cursor: Cursor, actions: &mut Vec<Action>) {
        if self.ui.cursor != cursor {
            self.ui.cursor = cursor;
            actions.push(Action::SetCursor(cursor.css().to_owned()));
        }
    }

    // --- Frame tick ---

    /// Redraw the editor if an image requested by an earlier render has
    /// since finished loading. Returns whether it redrew.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any surface call fails.
    pub fn tick<S: Surface>(&self, surface: &mut S) -> Result<bool, S::Error> {
        if !surface.take_loaded() {
            return Ok(false);
        }
        render::draw_editor(surface, &self.project, &self.ui)?;
        Ok(true)
    }

    // --- Queries ---

    /// The currently selected object id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.ui.selected_id
    }

    /// The selected object, resolved against the current scene.
    #[must_use]
    pub fn selected_object(&self) -> Option<&GameObject> {
        self.ui.selected_id.and_then(|id| self.project.object(&id))
    }

    /// Look up an object of the current scene by id.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&GameObject> {
        self.project.object(id)
    }
}

fn geometry_patch(g: Geometry) -> ObjectPatch {
    ObjectPatch {
        x: Some(g.x),
        y: Some(g.y),
        width: Some(g.width),
        height: Some(g.height),
        rotation: Some(g.rotation),
        ..ObjectPatch::default()
    }
}

/// The full editor engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    surface: WebSurface,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, project: Project) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, surface: WebSurface::new(ctx), core: EngineCore::with_project(project) })
    }

    pub fn load_project(&mut self, project: Project) {
        self.core.load_project(project);
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Returns `Err` if the cursor style cannot be set.
    pub fn on_pointer_down(&mut self, world_pt: Point) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_down(world_pt);
        self.apply(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the cursor style cannot be set.
    pub fn on_pointer_move(&mut self, world_pt: Point) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_move(world_pt);
        self.apply(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the cursor style cannot be set.
    pub fn on_pointer_up(&mut self, world_pt: Point) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_up(world_pt);
        self.apply(&actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the cursor style cannot be set.
    pub fn on_pointer_leave(&mut self) -> Result<Vec<Action>, JsValue> {
        let actions = self.core.on_pointer_leave();
        self.apply(&actions)?;
        Ok(actions)
    }

    /// Handle the cursor and redraw actions locally; the rest are for the host.
    fn apply(&mut self, actions: &[Action]) -> Result<(), JsValue> {
        for action in actions {
            match action {
                Action::SetCursor(css) => self.canvas.style().set_property("cursor", css)?,
                Action::RenderNeeded => self.render()?,
                Action::SelectionChanged(_) | Action::ObjectUpdated { .. } => {}
            }
        }
        Ok(())
    }

    // --- Render ---

    /// Call once per animation frame so placeholders are replaced as soon as
    /// their images load.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn tick(&mut self) -> Result<bool, JsValue> {
        self.core.tick(&mut self.surface)
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        render::draw_editor(&mut self.surface, &self.core.project, &self.core.ui)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.core.selection()
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&GameObject> {
        self.core.object(id)
    }
}
