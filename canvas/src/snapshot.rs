//! Whole-project JSON snapshots.
//!
//! The snapshot is the canonical persisted layout: a camelCase object with
//! `scenes`, `sprites`, `scripts`, and `animations`. Import validates the raw
//! `serde_json::Value` before anything is built, so a malformed file never
//! yields a partially imported project.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use serde_json::{Map, Value};

use crate::doc::Project;

/// Errors from [`from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed snapshot at {path}: {reason}")]
    Shape { path: String, reason: &'static str },
}

fn shape(path: impl Into<String>, reason: &'static str) -> ImportError {
    ImportError::Shape { path: path.into(), reason }
}

/// Serialize a project to pretty-printed JSON.
///
/// # Errors
///
/// Returns `Err` only if serialization itself fails.
pub fn to_json(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}

/// Rebuild a project from JSON. The first scene becomes current.
///
/// Objects without a `layer` receive their index within the scene, so a file
/// written without layers keeps its creation order.
///
/// # Errors
///
/// Returns `Json` for unparseable input or fields of the wrong type, and
/// `Shape` when a required collection or field is missing.
pub fn from_json(text: &str) -> Result<Project, ImportError> {
    let mut value: Value = serde_json::from_str(text)?;
    normalize(&mut value)?;
    let mut project: Project = serde_json::from_value(value)?;
    project.reset_current_scene();
    tracing::debug!(scenes = project.scenes.len(), sprites = project.sprites.len(), "snapshot imported");
    Ok(project)
}

fn normalize(value: &mut Value) -> Result<(), ImportError> {
    let root = value.as_object_mut().ok_or_else(|| shape("$", "expected an object"))?;

    for key in ["sprites", "scripts", "animations"] {
        match root.get(key) {
            None | Some(Value::Array(_)) => {}
            Some(_) => return Err(shape(key, "expected an array")),
        }
    }

    let scenes = root
        .get_mut("scenes")
        .ok_or_else(|| shape("scenes", "missing"))?
        .as_array_mut()
        .ok_or_else(|| shape("scenes", "expected an array"))?;

    for (i, scene) in scenes.iter_mut().enumerate() {
        let path = format!("scenes[{i}]");
        let scene = scene.as_object_mut().ok_or_else(|| shape(path.clone(), "expected an object"))?;
        require(scene, &path, "id")?;
        require(scene, &path, "name")?;
        let Some(objects) = scene.get_mut("objects") else {
            continue;
        };
        let objects = objects
            .as_array_mut()
            .ok_or_else(|| shape(format!("{path}.objects"), "expected an array"))?;
        for (j, obj) in objects.iter_mut().enumerate() {
            let path = format!("{path}.objects[{j}]");
            let obj = obj.as_object_mut().ok_or_else(|| shape(path.clone(), "expected an object"))?;
            for field in ["id", "name", "type", "x", "y", "width", "height"] {
                require(obj, &path, field)?;
            }
            if !obj.contains_key("layer") {
                obj.insert("layer".to_owned(), Value::from(j));
            }
        }
    }
    Ok(())
}

fn require(map: &Map<String, Value>, path: &str, field: &'static str) -> Result<(), ImportError> {
    if map.contains_key(field) {
        Ok(())
    } else {
        Err(shape(format!("{path}.{field}"), "missing"))
    }
}
