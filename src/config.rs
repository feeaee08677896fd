//! Command-line configuration parsed from environment variables.
//!
//! Every value has a default; flags on the individual subcommands override
//! what is configured here.

use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_TITLE: &str = "Stagehand Game";
pub const DEFAULT_FRAME_MS: u64 = 16;
pub const DEFAULT_MAX_FRAMES: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// wasm-bindgen glue of the browser player.
    pub player_js: Option<PathBuf>,
    /// Compiled browser player module.
    pub player_wasm: Option<PathBuf>,
    /// `<title>` of exported HTML.
    pub title: String,
    /// Session time between headless frames.
    pub frame_ms: u64,
    /// Headless frame count.
    pub max_frames: u64,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `STAGEHAND_PLAYER_JS`, `STAGEHAND_PLAYER_WASM`: player bundle paths
    /// - `STAGEHAND_TITLE`: default `Stagehand Game`
    /// - `STAGEHAND_FRAME_MS`: default 16
    /// - `STAGEHAND_MAX_FRAMES`: default 600
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            player_js: non_empty("STAGEHAND_PLAYER_JS").map(PathBuf::from),
            player_wasm: non_empty("STAGEHAND_PLAYER_WASM").map(PathBuf::from),
            title: non_empty("STAGEHAND_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            frame_ms: parse_or(lookup("STAGEHAND_FRAME_MS"), DEFAULT_FRAME_MS),
            max_frames: parse_or(lookup("STAGEHAND_MAX_FRAMES"), DEFAULT_MAX_FRAMES),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
