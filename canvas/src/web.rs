//! Browser surface: [`Surface`] over a `CanvasRenderingContext2d`.
//!
//! This module is the only place that touches web-sys drawing types. Image
//! elements are created on first request and polled for completion each
//! frame; a failed load stays "not ready" forever, which keeps the
//! placeholder on screen.

use std::collections::{HashMap, HashSet};

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::surface::{ImageKey, Surface, TextAlign};

/// Canvas2D context plus the images loaded for it.
pub struct WebSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<ImageKey, HtmlImageElement>,
    /// Requested images whose load has not completed yet.
    pending: HashSet<ImageKey>,
}

impl WebSurface {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, images: HashMap::new(), pending: HashSet::new() }
    }

    /// The wrapped context.
    #[must_use]
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl Surface for WebSurface {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.translate(x, y)
    }

    fn rotate(&mut self, radians: f64) -> Result<(), JsValue> {
        self.ctx.rotate(radians)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.scale(x, y)
    }

    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), JsValue> {
        let array = segments
            .iter()
            .map(|v| JsValue::from_f64(*v))
            .collect::<js_sys::Array>();
        self.ctx.set_line_dash(&array)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64, fill: bool, stroke: bool) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU)?;
        if fill {
            self.ctx.fill();
        }
        if stroke {
            self.ctx.stroke();
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, align: TextAlign) -> Result<(), JsValue> {
        self.ctx.set_font(font);
        match align {
            TextAlign::Center => {
                self.ctx.set_text_align("center");
                self.ctx.set_text_baseline("middle");
            }
            TextAlign::Left => {
                self.ctx.set_text_align("left");
                self.ctx.set_text_baseline("alphabetic");
            }
        }
        self.ctx.fill_text(text, x, y)
    }

    fn load_image(&mut self, key: ImageKey, url: &str) -> Result<(), JsValue> {
        if self.images.contains_key(&key) {
            return Ok(());
        }
        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));
        img.set_src(url);
        self.images.insert(key, img);
        self.pending.insert(key);
        Ok(())
    }

    fn image_ready(&self, key: ImageKey) -> bool {
        self.images
            .get(&key)
            .is_some_and(|img| img.complete() && img.natural_width() > 0)
    }

    fn take_loaded(&mut self) -> bool {
        let images = &self.images;
        let mut loaded = false;
        self.pending.retain(|key| match images.get(key) {
            Some(img) if img.complete() => {
                loaded |= img.natural_width() > 0;
                false
            }
            Some(_) => true,
            None => false,
        });
        loaded
    }

    fn draw_image(&mut self, key: ImageKey, x: f64, y: f64, w: f64, h: f64) -> Result<(), JsValue> {
        match self.images.get(&key) {
            Some(img) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h),
            None => Ok(()),
        }
    }
}
