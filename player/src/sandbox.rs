//! Script sandbox: runs user scripts in a rhai engine with an explicit API.
//!
//! Scripts never see host globals. Everything they can touch is registered
//! here: live object handles, a drawing handle whose commands are queued as
//! an overlay, a session key/value store, tweens, and logging. Top-level code
//! additionally finds `gameObjects`, `ctx` and `currentScene` in its scope;
//! script functions cannot see the scope and reach the same things through
//! `gameObjects()`, `canvas()` and `currentScene()`.
//!
//! Every fault (compile error, runtime error, failing handler or tween
//! callback) is logged, recorded as a [`ScriptFault`], and otherwise ignored.

#[cfg(test)]
#[path = "sandbox_test.rs"]
mod sandbox_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use canvas::doc::{Scene, Script};
use canvas::surface::{Surface, TextAlign};
use rhai::{AST, Dynamic, Engine, EvalAltResult, FLOAT, FnPtr, INT, ImmutableString, Map, Scope};

use crate::live::{LiveObject, LiveScene};
use crate::tween::{NumericProp, TweenRuntime};

/// Operation ceiling for a single script entry, so a runaway loop faults instead of hanging.
const MAX_OPERATIONS: u64 = 5_000_000;

/// Per-frame hook name, both global `update(dt)` and attached `update(dt, obj)`.
const UPDATE_HOOK: &str = "update";

const DEFAULT_PEN_COLOR: &str = "#000000";
const DEFAULT_PEN_FONT: &str = "16px Arial";

/// Why a script entry failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SandboxError {
    #[error("compile error: {0}")]
    Compile(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// A recorded failure and where it came from (script name, handler, or callback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFault {
    pub origin: String,
    pub error: SandboxError,
}

/// A drawing command queued by a script through the `ctx` handle.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    FillRect { x: f64, y: f64, w: f64, h: f64, color: String },
    StrokeRect { x: f64, y: f64, w: f64, h: f64, color: String, width: f64 },
    FillText { text: String, x: f64, y: f64, font: String, color: String },
}

impl OverlayCommand {
    /// Replay the command in world space.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface fails to draw.
    pub fn draw<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        match self {
            Self::FillRect { x, y, w, h, color } => {
                surface.set_fill(color);
                surface.fill_rect(*x, *y, *w, *h);
            }
            Self::StrokeRect { x, y, w, h, color, width } => {
                surface.set_stroke(color, *width);
                surface.stroke_rect(*x, *y, *w, *h);
            }
            Self::FillText { text, x, y, font, color } => {
                surface.set_fill(color);
                surface.fill_text(text, *x, *y, font, TextAlign::Left)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Pen {
    fill: String,
    stroke: String,
    line_width: f64,
    font: String,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            fill: DEFAULT_PEN_COLOR.to_owned(),
            stroke: DEFAULT_PEN_COLOR.to_owned(),
            line_width: 1.0,
            font: DEFAULT_PEN_FONT.to_owned(),
        }
    }
}

/// State reachable from registered functions.
struct Shared {
    scene: Rc<LiveScene>,
    tweens: TweenRuntime<FnPtr>,
    now: f64,
    pen: Pen,
    overlay: Vec<OverlayCommand>,
    vars: Map,
    logs: Vec<String>,
}

type SharedRef = Rc<RefCell<Shared>>;

// =============================================================================
// SCRIPT-FACING HANDLES
// =============================================================================

/// Live object handle. Property writes land on the shared record.
#[derive(Clone)]
pub struct ScriptObject {
    obj: LiveObject,
}

impl ScriptObject {
    fn id(&mut self) -> ImmutableString {
        self.obj.borrow().id.to_string().into()
    }

    fn kind(&mut self) -> ImmutableString {
        self.obj.borrow().kind.as_str().into()
    }

    fn text(&mut self) -> Dynamic {
        self.obj.borrow().text.clone().map_or(Dynamic::UNIT, Dynamic::from)
    }

    fn name(&mut self) -> ImmutableString {
        self.obj.borrow().name.clone().into()
    }

    fn set_name(&mut self, name: ImmutableString) {
        self.obj.borrow_mut().name = name.to_string();
    }

    fn visible(&mut self) -> bool {
        self.obj.borrow().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.obj.borrow_mut().visible = visible;
    }

    fn layer(&mut self) -> INT {
        self.obj.borrow().layer
    }

    fn set_layer(&mut self, layer: INT) {
        self.obj.borrow_mut().layer = layer;
    }
}

/// The id-keyed table behind `gameObjects`.
#[derive(Clone)]
pub struct ObjectTable {
    scene: Rc<LiveScene>,
}

impl ObjectTable {
    fn get(&mut self, id: ImmutableString) -> Dynamic {
        lookup(&self.scene, &Dynamic::from(id)).map_or(Dynamic::UNIT, |obj| Dynamic::from(ScriptObject { obj }))
    }

    /// Handles write through on their own; nothing to store back.
    fn set(&mut self, _id: ImmutableString, _value: Dynamic) {}

    fn ids(&mut self) -> rhai::Array {
        self.scene.ids().into_iter().map(|id| Dynamic::from(id.to_string())).collect()
    }

    fn len(&mut self) -> INT {
        INT::try_from(self.scene.len()).unwrap_or(INT::MAX)
    }
}

/// Drawing handle behind `ctx`.
#[derive(Clone)]
pub struct ScriptCanvas {
    shared: SharedRef,
}

impl ScriptCanvas {
    fn set_fill_style(&mut self, color: ImmutableString) {
        self.shared.borrow_mut().pen.fill = color.to_string();
    }

    fn set_stroke_style(&mut self, color: ImmutableString) {
        self.shared.borrow_mut().pen.stroke = color.to_string();
    }

    fn set_line_width(&mut self, width: Dynamic) {
        if let Some(width) = number(&width) {
            self.shared.borrow_mut().pen.line_width = width;
        }
    }

    fn set_font(&mut self, font: ImmutableString) {
        self.shared.borrow_mut().pen.font = font.to_string();
    }

    fn fill_rect(&mut self, x: Dynamic, y: Dynamic, w: Dynamic, h: Dynamic) {
        let Some([x, y, w, h]) = numbers([&x, &y, &w, &h]) else {
            return;
        };
        let mut shared = self.shared.borrow_mut();
        let color = shared.pen.fill.clone();
        shared.overlay.push(OverlayCommand::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: Dynamic, y: Dynamic, w: Dynamic, h: Dynamic) {
        let Some([x, y, w, h]) = numbers([&x, &y, &w, &h]) else {
            return;
        };
        let mut shared = self.shared.borrow_mut();
        let color = shared.pen.stroke.clone();
        let width = shared.pen.line_width;
        shared.overlay.push(OverlayCommand::StrokeRect { x, y, w, h, color, width });
    }

    fn fill_text(&mut self, text: Dynamic, x: Dynamic, y: Dynamic) {
        let Some([x, y]) = numbers([&x, &y]) else {
            return;
        };
        let mut shared = self.shared.borrow_mut();
        let font = shared.pen.font.clone();
        let color = shared.pen.fill.clone();
        shared.overlay.push(OverlayCommand::FillText { text: text.to_string(), x, y, font, color });
    }

    fn clear(&mut self) {
        self.shared.borrow_mut().overlay.clear();
    }
}

/// Session key/value store behind `vars()`.
#[derive(Clone)]
pub struct Vars {
    shared: SharedRef,
}

impl Vars {
    fn index_get(&mut self, key: ImmutableString) -> Dynamic {
        self.shared.borrow().vars.get(key.as_str()).cloned().unwrap_or(Dynamic::UNIT)
    }

    fn index_set(&mut self, key: ImmutableString, value: Dynamic) {
        self.shared.borrow_mut().vars.insert(key.as_str().into(), value);
    }

    fn get_or(&mut self, key: ImmutableString, default: Dynamic) -> Dynamic {
        self.shared.borrow().vars.get(key.as_str()).cloned().unwrap_or(default)
    }

    fn contains(&mut self, key: ImmutableString) -> bool {
        self.shared.borrow().vars.contains_key(key.as_str())
    }
}

#[allow(clippy::cast_precision_loss)]
fn number(value: &Dynamic) -> Option<f64> {
    if let Ok(f) = value.as_float() {
        return Some(f);
    }
    if let Ok(i) = value.as_int() {
        return Some(i as FLOAT);
    }
    None
}

fn numbers<const N: usize>(values: [&Dynamic; N]) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = number(value)?;
    }
    Some(out)
}

/// Resolve an id string or an object handle to a live record.
fn lookup(scene: &LiveScene, target: &Dynamic) -> Option<LiveObject> {
    if let Some(handle) = target.clone().try_cast::<ScriptObject>() {
        return Some(handle.obj);
    }
    let text = target.clone().into_immutable_string().unwrap_or_default();
    match uuid::Uuid::parse_str(text.trim()) {
        Ok(id) => scene.get(&id),
        Err(_) => None,
    }
}

fn scene_map(scene: &Scene) -> Map {
    let mut map = Map::new();
    map.insert("id".into(), Dynamic::from(scene.id.to_string()));
    map.insert("name".into(), Dynamic::from(scene.name.clone()));
    map.insert("width".into(), Dynamic::from(scene.width));
    map.insert("height".into(), Dynamic::from(scene.height));
    map.insert("backgroundColor".into(), Dynamic::from(scene.background_color.clone()));
    map
}

fn register_number(engine: &mut Engine, name: &'static str, prop: NumericProp) {
    engine.register_get(name, move |o: &mut ScriptObject| prop.get(&o.obj.borrow()).unwrap_or_default());
    engine.register_set(name, move |o: &mut ScriptObject, value: Dynamic| match number(&value) {
        Some(v) => prop.set(&mut o.obj.borrow_mut(), v),
        None => tracing::debug!(property = name, "non-numeric assignment ignored"),
    });
}

fn register_api(engine: &mut Engine, shared: &SharedRef) {
    engine.register_type_with_name::<ScriptObject>("GameObject");
    for (name, prop) in [
        ("x", NumericProp::X),
        ("y", NumericProp::Y),
        ("width", NumericProp::Width),
        ("height", NumericProp::Height),
        ("rotation", NumericProp::Rotation),
        ("scaleX", NumericProp::ScaleX),
        ("scaleY", NumericProp::ScaleY),
    ] {
        register_number(engine, name, prop);
    }
    engine.register_get("id", ScriptObject::id);
    engine.register_get("kind", ScriptObject::kind);
    engine.register_get("text", ScriptObject::text);
    engine.register_get_set("name", ScriptObject::name, ScriptObject::set_name);
    engine.register_get_set("visible", ScriptObject::visible, ScriptObject::set_visible);
    engine.register_get_set("layer", ScriptObject::layer, ScriptObject::set_layer);

    engine.register_type_with_name::<ObjectTable>("GameObjects");
    engine.register_indexer_get_set(ObjectTable::get, ObjectTable::set);
    engine.register_fn("ids", ObjectTable::ids);
    engine.register_fn("len", ObjectTable::len);

    engine.register_type_with_name::<ScriptCanvas>("Canvas");
    engine.register_set("fillStyle", ScriptCanvas::set_fill_style);
    engine.register_set("strokeStyle", ScriptCanvas::set_stroke_style);
    engine.register_set("lineWidth", ScriptCanvas::set_line_width);
    engine.register_set("font", ScriptCanvas::set_font);
    engine.register_fn("fillRect", ScriptCanvas::fill_rect);
    engine.register_fn("strokeRect", ScriptCanvas::stroke_rect);
    engine.register_fn("fillText", ScriptCanvas::fill_text);
    engine.register_fn("clear", ScriptCanvas::clear);

    engine.register_type_with_name::<Vars>("Vars");
    engine.register_indexer_get_set(Vars::index_get, Vars::index_set);
    engine.register_fn("get", Vars::get_or);
    engine.register_fn("contains", Vars::contains);

    let s = Rc::clone(shared);
    engine.register_fn("gameObjects", move || ObjectTable { scene: Rc::clone(&s.borrow().scene) });
    let s = Rc::clone(shared);
    engine.register_fn("canvas", move || ScriptCanvas { shared: Rc::clone(&s) });
    let s = Rc::clone(shared);
    engine.register_fn("currentScene", move || scene_map(s.borrow().scene.meta()));
    let s = Rc::clone(shared);
    engine.register_fn("vars", move || Vars { shared: Rc::clone(&s) });

    let s = Rc::clone(shared);
    engine.register_fn("tween", move |id: Dynamic, prop: ImmutableString, target: Dynamic, ms: Dynamic| {
        add_tween(&s, &id, &prop, &target, &ms, None)
    });
    let s = Rc::clone(shared);
    engine.register_fn(
        "tween",
        move |id: Dynamic, prop: ImmutableString, target: Dynamic, ms: Dynamic, callback: FnPtr| {
            add_tween(&s, &id, &prop, &target, &ms, Some(callback))
        },
    );

    let s = Rc::clone(shared);
    engine.register_fn("updateLabel", move |id: Dynamic, text: Dynamic| {
        let scene = Rc::clone(&s.borrow().scene);
        let Some(obj) = lookup(&scene, &id) else {
            tracing::debug!("updateLabel on missing object ignored");
            return false;
        };
        let mut obj = obj.borrow_mut();
        if !obj.kind.has_text() {
            return false;
        }
        obj.text = Some(text.to_string());
        true
    });

    let s = Rc::clone(shared);
    engine.register_fn("getObjectByName", move |name: ImmutableString| {
        s.borrow().scene.by_name(name.as_str()).map_or(Dynamic::UNIT, |obj| Dynamic::from(ScriptObject { obj }))
    });

    // Numeric overloads shadow the math package's `log`.
    let s = Rc::clone(shared);
    engine.register_fn("log", move |message: Dynamic| record_log(&s, &message.to_string()));
    let s = Rc::clone(shared);
    engine.register_fn("log", move |n: INT| record_log(&s, &n.to_string()));
    let s = Rc::clone(shared);
    engine.register_fn("log", move |n: FLOAT| record_log(&s, &n.to_string()));
    let s = Rc::clone(shared);
    engine.on_print(move |text| record_log(&s, text));
}

fn add_tween(shared: &SharedRef, id: &Dynamic, prop: &str, target: &Dynamic, ms: &Dynamic, callback: Option<FnPtr>) -> bool {
    let Some([target, ms]) = numbers([target, ms]) else {
        tracing::debug!(prop, "tween with non-numeric target or duration ignored");
        return false;
    };
    let mut guard = shared.borrow_mut();
    let state = &mut *guard;
    let Some(obj) = lookup(&state.scene, id) else {
        tracing::debug!(prop, "tween on missing object ignored");
        return false;
    };
    let object_id = obj.borrow().id;
    state.tweens.add(&state.scene, &object_id, prop, target, ms, state.now, callback)
}

fn record_log(shared: &SharedRef, message: &str) {
    tracing::info!(target: "script", "{message}");
    shared.borrow_mut().logs.push(message.to_owned());
}

// =============================================================================
// SANDBOX
// =============================================================================

/// One rhai engine, its shared scope, and the functions of every loaded script.
///
/// A script that defines `update(dt, obj)` can be attached to objects by
/// name; each frame that hook runs once per attached object, resolved
/// against the script's own functions first.
pub struct Sandbox {
    engine: Engine,
    scope: Scope<'static>,
    functions: AST,
    attached: HashMap<String, AST>,
    shared: SharedRef,
    faults: Vec<ScriptFault>,
}

impl Sandbox {
    #[must_use]
    pub fn new(scene: Rc<LiveScene>) -> Self {
        let scope_scene = scene_map(scene.meta());
        let shared = Rc::new(RefCell::new(Shared {
            scene: Rc::clone(&scene),
            tweens: TweenRuntime::new(),
            now: 0.0,
            pen: Pen::default(),
            overlay: Vec::new(),
            vars: Map::new(),
            logs: Vec::new(),
        }));

        let mut engine = Engine::new();
        engine.set_max_operations(MAX_OPERATIONS);
        register_api(&mut engine, &shared);

        let mut scope = Scope::new();
        scope.push("gameObjects", ObjectTable { scene });
        scope.push("ctx", ScriptCanvas { shared: Rc::clone(&shared) });
        scope.push_constant("currentScene", scope_scene);

        Self { engine, scope, functions: AST::empty(), attached: HashMap::new(), shared, faults: Vec::new() }
    }

    /// Compile every script, then run their top-level code in order.
    ///
    /// All compiled functions are visible to every script's top level, so a
    /// later script may call helpers defined earlier and vice versa.
    pub fn load(&mut self, scripts: &[Script]) {
        let mut compiled = Vec::with_capacity(scripts.len());
        for script in scripts {
            match self.engine.compile(&script.content) {
                Ok(ast) => {
                    self.functions = self.functions.merge(&ast.clone_functions_only());
                    compiled.push((script.name.as_str(), ast));
                }
                Err(e) => self.fault(&script.name, SandboxError::Compile(e.to_string())),
            }
        }
        for (name, ast) in compiled {
            if ast.iter_functions().any(|f| f.name == UPDATE_HOOK && f.params.len() == 2) {
                self.attached.insert(name.to_owned(), self.functions.merge(&ast.clone_functions_only()));
            }
            let program = self.functions.merge(&ast);
            if let Err(e) = self.engine.run_ast_with_scope(&mut self.scope, &program) {
                self.fault(name, SandboxError::Runtime(e.to_string()));
            }
        }
        tracing::debug!(scripts = scripts.len(), faults = self.faults.len(), "scripts loaded");
    }

    /// Whether a script function `name` taking `arity` arguments was loaded.
    #[must_use]
    pub fn has_function(&self, name: &str, arity: usize) -> bool {
        self.functions.iter_functions().any(|f| f.name == name && f.params.len() == arity)
    }

    /// Invoke a zero-argument handler by name. Returns `false` if no such function exists.
    pub fn call_handler(&mut self, name: &str) -> bool {
        let name = name.trim().trim_end_matches("()");
        if !self.has_function(name, 0) {
            tracing::debug!(handler = name, "missing handler ignored");
            return false;
        }
        let result = self.engine.call_fn::<Dynamic>(&mut self.scope, &self.functions, name, ());
        self.record(name, result);
        true
    }

    /// Run the per-frame `update(dt)` hook if a script defines one, then
    /// `update(dt, obj)` for every object with an attached script.
    pub fn run_update(&mut self, dt: f64) {
        if self.has_function(UPDATE_HOOK, 1) {
            let result = self.engine.call_fn::<Dynamic>(&mut self.scope, &self.functions, UPDATE_HOOK, (dt,));
            self.record(UPDATE_HOOK, result);
        }
        self.run_attached(dt);
    }

    fn run_attached(&mut self, dt: f64) {
        if self.attached.is_empty() {
            return;
        }
        let scene = Rc::clone(&self.shared.borrow().scene);
        for obj in scene.draw_order() {
            let Some(script) = obj.borrow().script.clone() else {
                continue;
            };
            let Some(ast) = self.attached.get(&script) else {
                continue;
            };
            let handle = ScriptObject { obj };
            let result = self.engine.call_fn::<Dynamic>(&mut self.scope, ast, UPDATE_HOOK, (dt, handle));
            self.record(&format!("{script}.update"), result);
        }
    }

    /// Set the session clock, advance tweens, then run finished callbacks in order.
    pub fn advance(&mut self, now: f64) {
        let finished = {
            let mut guard = self.shared.borrow_mut();
            let state = &mut *guard;
            state.now = now;
            state.tweens.tick(&state.scene, now)
        };
        for callback in finished {
            let result = callback.call::<Dynamic>(&self.engine, &self.functions, ());
            self.record("tween callback", result);
        }
    }

    pub fn set_now(&mut self, now: f64) {
        self.shared.borrow_mut().now = now;
    }

    #[must_use]
    pub fn active_tweens(&self) -> usize {
        self.shared.borrow().tweens.len()
    }

    pub fn clear_tweens(&mut self) {
        self.shared.borrow_mut().tweens.clear();
    }

    /// Drain the overlay queued since the last frame.
    pub fn take_overlay(&mut self) -> Vec<OverlayCommand> {
        std::mem::take(&mut self.shared.borrow_mut().overlay)
    }

    /// Drain the messages scripts logged.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.shared.borrow_mut().logs)
    }

    /// Read a `vars()` entry.
    #[must_use]
    pub fn var(&self, key: &str) -> Option<Dynamic> {
        self.shared.borrow().vars.get(key).cloned()
    }

    #[must_use]
    pub fn faults(&self) -> &[ScriptFault] {
        &self.faults
    }

    fn record(&mut self, origin: &str, result: Result<Dynamic, Box<EvalAltResult>>) {
        if let Err(e) = result {
            self.fault(origin, SandboxError::Runtime(e.to_string()));
        }
    }

    fn fault(&mut self, origin: &str, error: SandboxError) {
        tracing::warn!(script = %origin, error = %error, "script fault");
        self.faults.push(ScriptFault { origin: origin.to_owned(), error });
    }
}
