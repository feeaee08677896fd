//! Drawing surface abstraction targeted by the render pipeline.
//!
//! [`Surface`] mirrors the subset of the Canvas2D API the renderer needs.
//! Fallible calls return the implementation's error type so the browser
//! surface can propagate `JsValue` errors while [`DrawLog`] never fails.
//!
//! Images load asynchronously: the renderer asks [`Surface::image_ready`] on
//! every frame and draws a placeholder until the image can be used.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::collections::{HashMap, HashSet};
use std::convert::Infallible;

use crate::doc::{SceneId, SpriteId};

/// Identifies an image a surface can load and draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Sprite(SpriteId),
    Background(SceneId),
}

/// Horizontal anchoring for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Centered horizontally and vertically on the anchor point.
    Center,
    /// Left edge on the anchor, baseline at the anchor.
    Left,
}

/// Canvas2D-shaped drawing target.
pub trait Surface {
    type Error;

    /// Reset the transform and clear a `width` x `height` area.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the transform cannot be reset.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;
    fn save(&mut self);
    fn restore(&mut self);

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the transform.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the transform.
    fn rotate(&mut self, radians: f64) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the transform.
    fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;

    fn set_fill(&mut self, color: &str);
    fn set_stroke(&mut self, color: &str, width: f64);

    /// # Errors
    ///
    /// Returns `Err` if the dash pattern cannot be applied.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Self::Error>;

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// # Errors
    ///
    /// Returns `Err` if the arc cannot be built.
    fn circle(&mut self, x: f64, y: f64, radius: f64, fill: bool, stroke: bool) -> Result<(), Self::Error>;

    /// Draw `text` with the current fill in the given CSS `font`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails to draw text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, align: TextAlign) -> Result<(), Self::Error>;

    /// Begin loading `url` under `key` unless it is already known.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image element cannot be created.
    fn load_image(&mut self, key: ImageKey, url: &str) -> Result<(), Self::Error>;

    /// Whether the image for `key` has finished loading successfully.
    fn image_ready(&self, key: ImageKey) -> bool;

    /// Whether an image requested earlier became ready since the last call.
    ///
    /// Each finished load is reported once; a failed load is never reported.
    fn take_loaded(&mut self) -> bool;

    /// # Errors
    ///
    /// Returns `Err` if the backend fails to draw the image.
    fn draw_image(&mut self, key: ImageKey, x: f64, y: f64, w: f64, h: f64) -> Result<(), Self::Error>;
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear { width: f64, height: f64 },
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { radians: f64 },
    Scale { x: f64, y: f64 },
    LineDash(Vec<f64>),
    FillRect { x: f64, y: f64, w: f64, h: f64, color: String },
    StrokeRect { x: f64, y: f64, w: f64, h: f64, color: String, width: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Circle { x: f64, y: f64, radius: f64 },
    Text { text: String, x: f64, y: f64, font: String, color: String },
    Image { key: ImageKey, x: f64, y: f64, w: f64, h: f64 },
}

/// Surface that records every call instead of drawing.
///
/// Used by tests and by headless playback. Images are "ready" only after
/// [`DrawLog::mark_ready`], which stands in for the browser's load event.
#[derive(Debug, Clone)]
pub struct DrawLog {
    calls: Vec<DrawCall>,
    fill: String,
    stroke: String,
    line_width: f64,
    requested: HashMap<ImageKey, String>,
    pending: HashSet<ImageKey>,
    ready: HashSet<ImageKey>,
}

impl Default for DrawLog {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            fill: "#000000".to_owned(),
            stroke: "#000000".to_owned(),
            line_width: 1.0,
            requested: HashMap::new(),
            pending: HashSet::new(),
            ready: HashSet::new(),
        }
    }
}

impl DrawLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded since the last [`DrawLog::take_calls`].
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Pretend the image for `key` finished loading.
    pub fn mark_ready(&mut self, key: ImageKey) {
        self.ready.insert(key);
    }

    /// URL last requested for `key`, if any.
    #[must_use]
    pub fn requested_url(&self, key: ImageKey) -> Option<&str> {
        self.requested.get(&key).map(String::as_str)
    }

    /// Text strings drawn, in call order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of image draws recorded.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Image { .. })).count()
    }
}

impl Surface for DrawLog {
    type Error = Infallible;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Clear { width, height });
        Ok(())
    }

    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Translate { x, y });
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Rotate { radians });
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Scale { x, y });
        Ok(())
    }

    fn set_fill(&mut self, color: &str) {
        color.clone_into(&mut self.fill);
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        color.clone_into(&mut self.stroke);
        self.line_width = width;
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Infallible> {
        self.calls.push(DrawCall::LineDash(segments.to_vec()));
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color: self.fill.clone() });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::StrokeRect { x, y, w, h, color: self.stroke.clone(), width: self.line_width });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.calls.push(DrawCall::Line { x1, y1, x2, y2 });
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64, _fill: bool, _stroke: bool) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Circle { x, y, radius });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, _align: TextAlign) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            x,
            y,
            font: font.to_owned(),
            color: self.fill.clone(),
        });
        Ok(())
    }

    fn load_image(&mut self, key: ImageKey, url: &str) -> Result<(), Infallible> {
        if !self.requested.contains_key(&key) {
            self.requested.insert(key, url.to_owned());
            self.pending.insert(key);
        }
        Ok(())
    }

    fn image_ready(&self, key: ImageKey) -> bool {
        self.ready.contains(&key)
    }

    fn take_loaded(&mut self) -> bool {
        let ready = &self.ready;
        let before = self.pending.len();
        self.pending.retain(|key| !ready.contains(key));
        self.pending.len() != before
    }

    fn draw_image(&mut self, key: ImageKey, x: f64, y: f64, w: f64, h: f64) -> Result<(), Infallible> {
        self.calls.push(DrawCall::Image { key, x, y, w, h });
        Ok(())
    }
}
