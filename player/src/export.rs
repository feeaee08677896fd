//! Standalone HTML export.
//!
//! The exported page carries everything it needs: the project snapshot as
//! JSON, the player's wasm-bindgen glue as a JSON string, the wasm module as
//! base64, and the script sources in a `text/rhai` block for reading. The
//! player itself runs from the JSON snapshot. Every embedded payload has
//! `</` escaped so no payload can close its `<script>` element.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use canvas::consts::{DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};
use canvas::doc::Project;
use canvas::snapshot;

/// Element id of the canvas the player draws into.
pub const CANVAS_ID: &str = "stage";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize project: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The compiled browser player: wasm-bindgen glue (`--target web`) and its module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerBundle {
    pub glue_js: String,
    pub wasm: Vec<u8>,
}

impl PlayerBundle {
    /// Read the glue script and wasm module from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] naming the file that could not be read.
    pub fn load(glue_js: &Path, wasm: &Path) -> Result<Self, ExportError> {
        let glue = fs::read_to_string(glue_js).map_err(|source| ExportError::Io { path: glue_js.to_path_buf(), source })?;
        let module = fs::read(wasm).map_err(|source| ExportError::Io { path: wasm.to_path_buf(), source })?;
        Ok(Self { glue_js: glue, wasm: module })
    }
}

/// Canonical JSON export of the whole project.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn export_json(project: &Project) -> Result<String, ExportError> {
    Ok(snapshot::to_json(project)?)
}

/// Build the standalone HTML document.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if the project or glue cannot be serialized.
pub fn export_html(project: &Project, bundle: &PlayerBundle, title: &str) -> Result<String, ExportError> {
    let project_json = snapshot::to_json(project)?;
    let glue_json = serde_json::to_string(&bundle.glue_js)?;
    let wasm_b64 = STANDARD.encode(&bundle.wasm);
    let scripts = project
        .scripts
        .iter()
        .map(|s| format!("// {}\n{}", s.name, s.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    let (width, height) = project
        .current_scene()
        .or_else(|| project.scenes.first())
        .map_or((DEFAULT_SCENE_WIDTH, DEFAULT_SCENE_HEIGHT), |s| (s.width, s.height));

    let mut html = String::with_capacity(project_json.len() + wasm_b64.len() + glue_json.len() + 2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<canvas id=\"{CANVAS_ID}\" width=\"{width}\" height=\"{height}\"></canvas>\n"));
    push_block(&mut html, "application/json", "stagehand-project", &project_json);
    push_block(&mut html, "application/json", "stagehand-player-js", &glue_json);
    push_block(&mut html, "application/wasm;base64", "stagehand-player-wasm", &wasm_b64);
    push_block(&mut html, "text/rhai", "stagehand-scripts", &scripts);
    html.push_str("<script type=\"module\">\n");
    html.push_str(&BOOTSTRAP.replace("{CANVAS_ID}", CANVAS_ID));
    html.push_str("</script>\n</body>\n</html>\n");

    tracing::info!(bytes = html.len(), scripts = project.scripts.len(), "exported html");
    Ok(html)
}

/// Make `text` safe to embed inside a `<script>` element.
#[must_use]
pub fn escape_script(text: &str) -> String {
    text.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn push_block(html: &mut String, kind: &str, id: &str, body: &str) {
    html.push_str("<script type=\"");
    html.push_str(kind);
    html.push_str("\" id=\"");
    html.push_str(id);
    html.push_str("\">");
    html.push_str(&escape_script(body));
    html.push_str("</script>\n");
}

const STYLE: &str = "<style>\n\
html, body { margin: 0; height: 100%; background: #111; }\n\
body { display: flex; align-items: center; justify-content: center; }\n\
canvas { background: #fff; }\n\
</style>\n";

const BOOTSTRAP: &str = r"const text = (id) => document.getElementById(id).textContent;
const glue = new Blob([JSON.parse(text('stagehand-player-js'))], { type: 'text/javascript' });
const bytes = Uint8Array.from(atob(text('stagehand-player-wasm').trim()), (c) => c.charCodeAt(0));
const player = await import(URL.createObjectURL(glue));
await player.default({ module_or_path: bytes });
const stage = new player.StagePlayer('{CANVAS_ID}', text('stagehand-project'));
stage.start();
window.addEventListener('pagehide', () => stage.stop());
";
