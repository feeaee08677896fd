//! Document model: scenes, game objects, sprites, scripts, and the project store.
//!
//! This module defines the data that describes a project (`Project`, `Scene`,
//! `GameObject`, `Sprite`, `Script`, `Animation`), sparse-update types for
//! incremental edits (`ObjectPatch`, `ScenePatch`, `AnimationPatch`), and the
//! command surface the editor UI mutates the project through.
//!
//! `Project` is the single arena for everything. The current scene and the
//! selection are ids resolved on every lookup, never cached copies, so there
//! is no second list to keep in lockstep.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_FONT_SIZE, DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH, MIN_OBJECT_SIZE};
use crate::layer::{self, Reorder};
use crate::transform::Point;

/// Unique identifier for a game object.
pub type ObjectId = Uuid;
/// Unique identifier for a scene.
pub type SceneId = Uuid;
/// Unique identifier for a sprite.
pub type SpriteId = Uuid;
/// Unique identifier for a script.
pub type ScriptId = Uuid;
/// Unique identifier for an animation.
pub type AnimationId = Uuid;

/// Errors returned by project commands that name something that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    #[error("no current scene")]
    NoCurrentScene,
    #[error("scene not found: {0}")]
    SceneNotFound(SceneId),
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),
    #[error("sprite not found: {0}")]
    SpriteNotFound(SpriteId),
    #[error("script not found: {0}")]
    ScriptNotFound(ScriptId),
    #[error("animation not found: {0}")]
    AnimationNotFound(AnimationId),
}

/// The variant of a game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Image drawn from a sprite; placeholder rectangle until the image is ready.
    Sprite,
    /// Filled and outlined rectangle.
    Panel,
    /// Filled rectangle with centered caption text.
    Button,
    /// Text only.
    Label,
}

impl ObjectKind {
    /// Whether the visible text of this kind may be changed at runtime.
    #[must_use]
    pub fn has_text(self) -> bool {
        matches!(self, Self::Button | Self::Label)
    }

    /// The serialized name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sprite => "sprite",
            Self::Panel => "panel",
            Self::Button => "button",
            Self::Label => "label",
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// A positioned, renderable entity in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Center x in world coordinates.
    pub x: f64,
    /// Center y in world coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Stacking order; higher layers draw on top and are hit first.
    #[serde(default)]
    pub layer: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationId>,
    /// Name of an attached script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Text color as a CSS color string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Name of the script function invoked when the object is clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<String>,
}

impl GameObject {
    /// Build an object of `kind` with the editor's defaults for that kind.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        let (width, height) = match kind {
            ObjectKind::Label => (200.0, 50.0),
            _ => (100.0, 100.0),
        };
        let text = match kind {
            ObjectKind::Label => Some("LABEL TEXT".to_owned()),
            ObjectKind::Button => Some("BUTTON".to_owned()),
            _ => None,
        };
        let background_color = match kind {
            ObjectKind::Panel => Some("#FFFFFF".to_owned()),
            ObjectKind::Button => Some("#FFE600".to_owned()),
            _ => None,
        };
        let name = match kind {
            ObjectKind::Sprite => "New sprite",
            ObjectKind::Panel => "New panel",
            ObjectKind::Button => "New button",
            ObjectKind::Label => "New label",
        };
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            kind,
            x: DEFAULT_SCENE_WIDTH / 2.0,
            y: DEFAULT_SCENE_HEIGHT / 2.0,
            width,
            height,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            visible: true,
            layer: 0,
            sprite: None,
            animation: None,
            script: None,
            text,
            font_size: Some(DEFAULT_FONT_SIZE),
            color: Some("#000000".to_owned()),
            background_color,
            on_click: None,
        }
    }

    /// World-space center of the object.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Sparse update for a game object. Only present fields are applied.
///
/// Optional references use a nested `Option`: `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub name: Option<String>,
    pub kind: Option<ObjectKind>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub visible: Option<bool>,
    pub layer: Option<i64>,
    pub sprite: Option<Option<SpriteId>>,
    pub animation: Option<Option<AnimationId>>,
    pub script: Option<Option<String>>,
    pub text: Option<Option<String>>,
    pub font_size: Option<Option<f64>>,
    pub color: Option<Option<String>>,
    pub background_color: Option<Option<String>>,
    pub on_click: Option<Option<String>>,
}

impl ObjectPatch {
    /// Apply every present field to `obj`. Width and height are floored at the minimum size.
    pub fn apply(&self, obj: &mut GameObject) {
        if let Some(ref name) = self.name {
            obj.name.clone_from(name);
        }
        if let Some(kind) = self.kind {
            obj.kind = kind;
        }
        if let Some(x) = self.x {
            obj.x = x;
        }
        if let Some(y) = self.y {
            obj.y = y;
        }
        if let Some(w) = self.width {
            obj.width = w.max(MIN_OBJECT_SIZE);
        }
        if let Some(h) = self.height {
            obj.height = h.max(MIN_OBJECT_SIZE);
        }
        if let Some(r) = self.rotation {
            obj.rotation = r;
        }
        if let Some(sx) = self.scale_x {
            obj.scale_x = sx;
        }
        if let Some(sy) = self.scale_y {
            obj.scale_y = sy;
        }
        if let Some(v) = self.visible {
            obj.visible = v;
        }
        if let Some(l) = self.layer {
            obj.layer = l;
        }
        if let Some(sprite) = self.sprite {
            obj.sprite = sprite;
        }
        if let Some(animation) = self.animation {
            obj.animation = animation;
        }
        if let Some(ref script) = self.script {
            obj.script.clone_from(script);
        }
        if let Some(ref text) = self.text {
            obj.text.clone_from(text);
        }
        if let Some(font_size) = self.font_size {
            obj.font_size = font_size;
        }
        if let Some(ref color) = self.color {
            obj.color.clone_from(color);
        }
        if let Some(ref bg) = self.background_color {
            obj.background_color.clone_from(bg);
        }
        if let Some(ref on_click) = self.on_click {
            obj.on_click.clone_from(on_click);
        }
    }

    /// Patch that only moves the object.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }
}

fn default_scene_width() -> f64 {
    DEFAULT_SCENE_WIDTH
}

fn default_scene_height() -> f64 {
    DEFAULT_SCENE_HEIGHT
}

fn default_background() -> String {
    "#ffffff".to_owned()
}

/// A collection of game objects with canvas settings.
///
/// Insertion order of `objects` only breaks ties between equal layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    #[serde(default = "default_scene_width")]
    pub width: f64,
    #[serde(default = "default_scene_height")]
    pub height: f64,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub objects: Vec<GameObject>,
}

impl Scene {
    /// Create an empty scene with the default canvas size.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width: DEFAULT_SCENE_WIDTH,
            height: DEFAULT_SCENE_HEIGHT,
            background_color: default_background(),
            background_image: None,
            objects: Vec::new(),
        }
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == *id)
    }

    pub fn object_mut(&mut self, id: &ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id == *id)
    }

    /// The layer a newly created object receives: one above the current top.
    #[must_use]
    pub fn next_layer(&self) -> i64 {
        self.objects.iter().map(|o| o.layer).max().unwrap_or(0) + 1
    }
}

/// Sparse update for scene settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePatch {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub background_color: Option<String>,
    pub background_image: Option<Option<String>>,
}

/// An image asset. Only the name may change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprite {
    pub id: SpriteId,
    pub name: String,
    /// URL or data URL of the image.
    pub url: String,
    pub width: f64,
    pub height: f64,
}

/// User-authored script source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub id: ScriptId,
    pub name: String,
    pub content: String,
}

/// Frame-sheet animation metadata attached to sprites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub id: AnimationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteId>,
    #[serde(default)]
    pub frames: Vec<u32>,
    pub frame_rate: f64,
}

/// Sparse update for an animation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationPatch {
    pub name: Option<String>,
    pub sprite: Option<Option<SpriteId>>,
    pub frames: Option<Vec<u32>>,
    pub frame_rate: Option<f64>,
}

/// The scene graph store: every scene, asset, and script of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub sprites: Vec<Sprite>,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub animations: Vec<Animation>,
    #[serde(skip)]
    current_scene: Option<SceneId>,
}

impl Project {
    /// A project with a single empty "Main Scene" that is current.
    #[must_use]
    pub fn new() -> Self {
        let mut project = Self::empty();
        project.add_scene("Main Scene");
        project
    }

    /// A project with no scenes at all.
    #[must_use]
    pub fn empty() -> Self {
        Self { scenes: Vec::new(), sprites: Vec::new(), scripts: Vec::new(), animations: Vec::new(), current_scene: None }
    }

    // --- Scenes ---

    /// Add a scene. It becomes current when no scene was current.
    pub fn add_scene(&mut self, name: impl Into<String>) -> SceneId {
        let scene = Scene::new(name);
        let id = scene.id;
        self.scenes.push(scene);
        if self.current_scene.is_none() {
            self.current_scene = Some(id);
        }
        id
    }

    /// Apply a partial update to a scene's settings.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` if no scene has this id.
    pub fn update_scene(&mut self, id: &SceneId, patch: &ScenePatch) -> Result<(), DocError> {
        let scene = self.scene_mut(id).ok_or(DocError::SceneNotFound(*id))?;
        if let Some(ref name) = patch.name {
            scene.name.clone_from(name);
        }
        if let Some(w) = patch.width {
            scene.width = w;
        }
        if let Some(h) = patch.height {
            scene.height = h;
        }
        if let Some(ref bg) = patch.background_color {
            scene.background_color.clone_from(bg);
        }
        if let Some(ref image) = patch.background_image {
            scene.background_image.clone_from(image);
        }
        Ok(())
    }

    /// Remove a scene. If it was current, the first remaining scene becomes current.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` if no scene has this id.
    pub fn delete_scene(&mut self, id: &SceneId) -> Result<Scene, DocError> {
        let idx = self
            .scenes
            .iter()
            .position(|s| s.id == *id)
            .ok_or(DocError::SceneNotFound(*id))?;
        let removed = self.scenes.remove(idx);
        if self.current_scene == Some(*id) {
            self.current_scene = self.scenes.first().map(|s| s.id);
        }
        Ok(removed)
    }

    /// Make a scene current.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` if no scene has this id.
    pub fn set_current_scene(&mut self, id: &SceneId) -> Result<(), DocError> {
        if self.scene(id).is_none() {
            return Err(DocError::SceneNotFound(*id));
        }
        self.current_scene = Some(*id);
        Ok(())
    }

    #[must_use]
    pub fn current_scene_id(&self) -> Option<SceneId> {
        self.current_scene
    }

    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene.and_then(|id| self.scene(&id))
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        let id = self.current_scene?;
        self.scene_mut(&id)
    }

    #[must_use]
    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == *id)
    }

    pub fn scene_mut(&mut self, id: &SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == *id)
    }

    // --- Objects (current scene) ---

    /// Create an object of `kind` with default fields on top of the current scene.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` if the project has no current scene.
    pub fn create_object(&mut self, kind: ObjectKind) -> Result<ObjectId, DocError> {
        let scene = self.current_scene_mut().ok_or(DocError::NoCurrentScene)?;
        let mut obj = GameObject::new(kind);
        obj.layer = scene.next_layer();
        let id = obj.id;
        scene.objects.push(obj);
        Ok(id)
    }

    /// Insert a fully specified object into the current scene, keeping its layer.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` if the project has no current scene.
    pub fn insert_object(&mut self, obj: GameObject) -> Result<ObjectId, DocError> {
        let scene = self.current_scene_mut().ok_or(DocError::NoCurrentScene)?;
        let id = obj.id;
        scene.objects.push(obj);
        Ok(id)
    }

    /// Apply a partial update to an object of the current scene.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` or `ObjectNotFound`.
    pub fn update_object(&mut self, id: &ObjectId, patch: &ObjectPatch) -> Result<(), DocError> {
        let scene = self.current_scene_mut().ok_or(DocError::NoCurrentScene)?;
        let obj = scene.object_mut(id).ok_or(DocError::ObjectNotFound(*id))?;
        patch.apply(obj);
        Ok(())
    }

    /// Remove an object from the current scene.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` or `ObjectNotFound`.
    pub fn delete_object(&mut self, id: &ObjectId) -> Result<GameObject, DocError> {
        let scene = self.current_scene_mut().ok_or(DocError::NoCurrentScene)?;
        let idx = scene
            .objects
            .iter()
            .position(|o| o.id == *id)
            .ok_or(DocError::ObjectNotFound(*id))?;
        Ok(scene.objects.remove(idx))
    }

    /// Move an object within the current scene's layer order.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentScene` or `ObjectNotFound`.
    pub fn reorder_object(&mut self, id: &ObjectId, direction: Reorder) -> Result<(), DocError> {
        let scene = self.current_scene_mut().ok_or(DocError::NoCurrentScene)?;
        if layer::reorder(&mut scene.objects, id, direction) {
            Ok(())
        } else {
            Err(DocError::ObjectNotFound(*id))
        }
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&GameObject> {
        self.current_scene()?.object(id)
    }

    // --- Sprites ---

    pub fn add_sprite(&mut self, name: impl Into<String>, url: impl Into<String>, width: f64, height: f64) -> SpriteId {
        let sprite = Sprite { id: Uuid::new_v4(), name: name.into(), url: url.into(), width, height };
        let id = sprite.id;
        self.sprites.push(sprite);
        id
    }

    /// Rename a sprite. The image source is immutable.
    ///
    /// # Errors
    ///
    /// Returns `SpriteNotFound` if no sprite has this id.
    pub fn rename_sprite(&mut self, id: &SpriteId, name: impl Into<String>) -> Result<(), DocError> {
        let sprite = self
            .sprites
            .iter_mut()
            .find(|s| s.id == *id)
            .ok_or(DocError::SpriteNotFound(*id))?;
        sprite.name = name.into();
        Ok(())
    }

    /// Remove a sprite. Objects still referencing it render the placeholder.
    ///
    /// # Errors
    ///
    /// Returns `SpriteNotFound` if no sprite has this id.
    pub fn delete_sprite(&mut self, id: &SpriteId) -> Result<Sprite, DocError> {
        let idx = self
            .sprites
            .iter()
            .position(|s| s.id == *id)
            .ok_or(DocError::SpriteNotFound(*id))?;
        Ok(self.sprites.remove(idx))
    }

    #[must_use]
    pub fn sprite(&self, id: &SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == *id)
    }

    // --- Scripts ---

    pub fn add_script(&mut self, name: impl Into<String>, content: impl Into<String>) -> ScriptId {
        let script = Script { id: Uuid::new_v4(), name: name.into(), content: content.into() };
        let id = script.id;
        self.scripts.push(script);
        id
    }

    /// Replace a script's source.
    ///
    /// # Errors
    ///
    /// Returns `ScriptNotFound` if no script has this id.
    pub fn update_script(&mut self, id: &ScriptId, content: impl Into<String>) -> Result<(), DocError> {
        let script = self
            .scripts
            .iter_mut()
            .find(|s| s.id == *id)
            .ok_or(DocError::ScriptNotFound(*id))?;
        script.content = content.into();
        Ok(())
    }

    /// Remove a script. Objects naming it simply fail the lookup later.
    ///
    /// # Errors
    ///
    /// Returns `ScriptNotFound` if no script has this id.
    pub fn delete_script(&mut self, id: &ScriptId) -> Result<Script, DocError> {
        let idx = self
            .scripts
            .iter()
            .position(|s| s.id == *id)
            .ok_or(DocError::ScriptNotFound(*id))?;
        Ok(self.scripts.remove(idx))
    }

    #[must_use]
    pub fn script_by_name(&self, name: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.name == name)
    }

    // --- Animations ---

    pub fn add_animation(&mut self, name: impl Into<String>, sprite: Option<SpriteId>, frames: Vec<u32>, frame_rate: f64) -> AnimationId {
        let animation = Animation { id: Uuid::new_v4(), name: name.into(), sprite, frames, frame_rate };
        let id = animation.id;
        self.animations.push(animation);
        id
    }

    /// Apply a partial update to an animation.
    ///
    /// # Errors
    ///
    /// Returns `AnimationNotFound` if no animation has this id.
    pub fn update_animation(&mut self, id: &AnimationId, patch: &AnimationPatch) -> Result<(), DocError> {
        let animation = self
            .animations
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or(DocError::AnimationNotFound(*id))?;
        if let Some(ref name) = patch.name {
            animation.name.clone_from(name);
        }
        if let Some(sprite) = patch.sprite {
            animation.sprite = sprite;
        }
        if let Some(ref frames) = patch.frames {
            animation.frames.clone_from(frames);
        }
        if let Some(rate) = patch.frame_rate {
            animation.frame_rate = rate;
        }
        Ok(())
    }

    /// Remove an animation.
    ///
    /// # Errors
    ///
    /// Returns `AnimationNotFound` if no animation has this id.
    pub fn delete_animation(&mut self, id: &AnimationId) -> Result<Animation, DocError> {
        let idx = self
            .animations
            .iter()
            .position(|a| a.id == *id)
            .ok_or(DocError::AnimationNotFound(*id))?;
        Ok(self.animations.remove(idx))
    }

    /// Point the current-scene marker at the first scene, as after a fresh load.
    pub(crate) fn reset_current_scene(&mut self) {
        self.current_scene = self.scenes.first().map(|s| s.id);
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
