//! Tween runtime: linear interpolation of numeric object properties.
//!
//! A tween captures the property's value when it is registered and moves it
//! toward the target over `duration` milliseconds of session time. The
//! callback type is generic so the runtime does not depend on the script
//! engine; the sandbox instantiates it with script function pointers.

#[cfg(test)]
#[path = "tween_test.rs"]
mod tween_test;

use canvas::doc::{GameObject, ObjectId};

use crate::live::LiveScene;

/// A property a tween may drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericProp {
    X,
    Y,
    Width,
    Height,
    Rotation,
    ScaleX,
    ScaleY,
    FontSize,
}

impl NumericProp {
    /// Resolve a script-facing property name. Snake-case spellings are accepted.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "x" => Self::X,
            "y" => Self::Y,
            "width" => Self::Width,
            "height" => Self::Height,
            "rotation" => Self::Rotation,
            "scaleX" | "scale_x" => Self::ScaleX,
            "scaleY" | "scale_y" => Self::ScaleY,
            "fontSize" | "font_size" => Self::FontSize,
            _ => return None,
        })
    }

    /// Current value, or `None` when the object does not carry it.
    #[must_use]
    pub fn get(self, obj: &GameObject) -> Option<f64> {
        match self {
            Self::X => Some(obj.x),
            Self::Y => Some(obj.y),
            Self::Width => Some(obj.width),
            Self::Height => Some(obj.height),
            Self::Rotation => Some(obj.rotation),
            Self::ScaleX => Some(obj.scale_x),
            Self::ScaleY => Some(obj.scale_y),
            Self::FontSize => obj.font_size,
        }
    }

    pub fn set(self, obj: &mut GameObject, value: f64) {
        match self {
            Self::X => obj.x = value,
            Self::Y => obj.y = value,
            Self::Width => obj.width = value,
            Self::Height => obj.height = value,
            Self::Rotation => obj.rotation = value,
            Self::ScaleX => obj.scale_x = value,
            Self::ScaleY => obj.scale_y = value,
            Self::FontSize => obj.font_size = Some(value),
        }
    }
}

/// One in-flight interpolation.
#[derive(Debug, Clone)]
pub struct Tween<C> {
    pub target: ObjectId,
    pub prop: NumericProp,
    pub start: f64,
    pub delta: f64,
    pub started_at: f64,
    pub duration: f64,
    pub callback: Option<C>,
}

impl<C> Tween<C> {
    /// Fraction of the way through at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 || self.duration.is_nan() {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }
}

/// Ordered set of active tweens.
#[derive(Debug)]
pub struct TweenRuntime<C> {
    records: Vec<Tween<C>>,
}

impl<C> Default for TweenRuntime<C> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<C> TweenRuntime<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register a tween of `prop` on `id` toward `target`.
    ///
    /// Returns `false`, registering nothing, when the object is absent, the
    /// property is unknown, or the object does not carry the property.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        scene: &LiveScene,
        id: &ObjectId,
        prop: &str,
        target: f64,
        duration: f64,
        now: f64,
        callback: Option<C>,
    ) -> bool {
        let Some(obj) = scene.get(id) else {
            tracing::debug!(%id, "tween on missing object ignored");
            return false;
        };
        let Some(prop_kind) = NumericProp::parse(prop) else {
            tracing::debug!(%id, prop, "tween on unknown property ignored");
            return false;
        };
        let Some(start) = prop_kind.get(&obj.borrow()) else {
            tracing::debug!(%id, prop, "tween on unset property ignored");
            return false;
        };
        self.records.push(Tween {
            target: *id,
            prop: prop_kind,
            start,
            delta: target - start,
            started_at: now,
            duration,
            callback,
        });
        true
    }

    /// Advance every tween to `now` and return the callbacks of those that finished.
    ///
    /// Records are applied in registration order, so a later tween on the same
    /// property wins for this frame. Finished records are removed.
    pub fn tick(&mut self, scene: &LiveScene, now: f64) -> Vec<C> {
        let mut finished = Vec::new();
        let mut remaining = Vec::with_capacity(self.records.len());
        for mut record in self.records.drain(..) {
            let progress = record.progress(now);
            if let Some(obj) = scene.get(&record.target) {
                record.prop.set(&mut obj.borrow_mut(), record.start + record.delta * progress);
            }
            if progress >= 1.0 {
                finished.extend(record.callback.take());
            } else {
                remaining.push(record);
            }
        }
        self.records = remaining;
        finished
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
