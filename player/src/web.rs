//! Browser player: drives a [`Session`] from `requestAnimationFrame`.
//!
//! The exported page constructs a [`StagePlayer`] with its canvas id and the
//! embedded project JSON, then calls `start()`. `stop()` cancels the pending
//! frame, drops the frame and click closures, and ends the session, so
//! nothing fires after teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canvas::doc::Project;
use canvas::snapshot;
use canvas::transform::Point;
use canvas::web::WebSurface;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use crate::session::Session;

type FrameCallback = Closure<dyn FnMut(f64)>;
type ClickCallback = Closure<dyn FnMut(MouseEvent)>;

struct Running {
    session: Session,
    surface: WebSurface,
}

#[wasm_bindgen]
pub struct StagePlayer {
    canvas: HtmlCanvasElement,
    project: Project,
    running: Rc<RefCell<Option<Running>>>,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    raf_id: Rc<Cell<Option<i32>>>,
    click: Option<ClickCallback>,
}

#[wasm_bindgen]
impl StagePlayer {
    /// Bind to the canvas with `canvas_id` and parse the project snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the snapshot is malformed or the canvas is missing.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, project_json: &str) -> Result<StagePlayer, JsValue> {
        let project = snapshot::from_json(project_json).map_err(js_error)?;
        let document = window()?.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        Ok(Self {
            canvas,
            project,
            running: Rc::new(RefCell::new(None)),
            frame: Rc::new(RefCell::new(None)),
            raf_id: Rc::new(Cell::new(None)),
            click: None,
        })
    }

    /// Start (or restart) playback from the authored project.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there is no scene, no 2D context, or a frame cannot be requested.
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.stop();
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let now = window()?.performance().map_or(0.0, |p| p.now());
        let session = Session::start(&self.project, now).map_err(js_error)?;
        *self.running.borrow_mut() = Some(Running { session, surface: WebSurface::new(ctx) });
        self.listen_for_clicks()?;
        self.schedule_frames()
    }

    /// Stop playback. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(id) = self.raf_id.take() {
            if let Ok(w) = window() {
                if let Err(e) = w.cancel_animation_frame(id) {
                    tracing::warn!(error = ?e, "cancel_animation_frame failed");
                }
            }
        }
        self.frame.borrow_mut().take();
        if let Some(click) = self.click.take() {
            if let Err(e) = self.canvas.remove_event_listener_with_callback("click", click.as_ref().unchecked_ref()) {
                tracing::warn!(error = ?e, "failed to remove click listener");
            }
        }
        if let Some(mut running) = self.running.borrow_mut().take() {
            running.session.stop();
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.borrow().is_some()
    }
}

impl StagePlayer {
    fn schedule_frames(&mut self) -> Result<(), JsValue> {
        let again = Rc::clone(&self.frame);
        let running = Rc::clone(&self.running);
        let raf_id = Rc::clone(&self.raf_id);
        let callback = Closure::wrap(Box::new(move |ts: f64| {
            raf_id.set(None);
            let mut state = running.borrow_mut();
            let Some(run) = state.as_mut() else {
                return;
            };
            if let Err(e) = run.session.frame(ts, &mut run.surface) {
                tracing::warn!(error = ?e, "frame render failed");
            }
            for line in run.session.take_logs() {
                web_sys::console::log_1(&JsValue::from_str(&line));
            }
            drop(state);
            if let Some(cb) = again.borrow().as_ref() {
                match request_frame(cb) {
                    Ok(id) => raf_id.set(Some(id)),
                    Err(e) => tracing::warn!(error = ?e, "request_animation_frame failed"),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = request_frame(&callback)?;
        self.raf_id.set(Some(id));
        *self.frame.borrow_mut() = Some(callback);
        Ok(())
    }

    fn listen_for_clicks(&mut self) -> Result<(), JsValue> {
        let running = Rc::clone(&self.running);
        let canvas = self.canvas.clone();
        let callback = Closure::wrap(Box::new(move |e: MouseEvent| {
            let pt = canvas_point(&canvas, &e);
            if let Some(run) = running.borrow_mut().as_mut() {
                if let Some(id) = run.session.click(pt) {
                    tracing::debug!(%id, "clicked");
                }
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        self.canvas.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
        self.click = Some(callback);
        Ok(())
    }
}

impl Drop for StagePlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Map a mouse event to canvas pixels, accounting for CSS scaling.
fn canvas_point(canvas: &HtmlCanvasElement, e: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { f64::from(canvas.width()) / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { f64::from(canvas.height()) / rect.height() } else { 1.0 };
    Point::new((f64::from(e.client_x()) - rect.left()) * sx, (f64::from(e.client_y()) - rect.top()) * sy)
}

fn request_frame(cb: &FrameCallback) -> Result<i32, JsValue> {
    window()?.request_animation_frame(cb.as_ref().unchecked_ref())
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
