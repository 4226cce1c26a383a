//! `jot.toml` discovery and parsing.
//!
//! Every setting is optional; a missing file, a missing table or a file that
//! fails to parse all yield the defaults. Unknown fields are ignored so old
//! binaries keep reading newer files.
//!
//! ```toml
//! [scroll]
//! sensitivity = 0.125   # wheel rows per pointer row, clamped to (0, 1]
//!
//! [completion]
//! max_candidates = 10   # 0 selects the default
//!
//! [mouse]
//! multi_click_ms = 666  # double / triple click window
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "jot.toml";
pub const DEFAULT_SCROLL_SENSITIVITY: f32 = 0.125;
pub const DEFAULT_MAX_CANDIDATES: usize = 10;
pub const DEFAULT_MULTI_CLICK_MS: u64 = 666;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScrollConfig {
    #[serde(default = "ScrollConfig::default_sensitivity")]
    pub sensitivity: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            sensitivity: Self::default_sensitivity(),
        }
    }
}

impl ScrollConfig {
    const fn default_sensitivity() -> f32 {
        DEFAULT_SCROLL_SENSITIVITY
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    #[serde(default = "CompletionConfig::default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_candidates: Self::default_max_candidates(),
        }
    }
}

impl CompletionConfig {
    const fn default_max_candidates() -> usize {
        DEFAULT_MAX_CANDIDATES
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MouseConfig {
    #[serde(default = "MouseConfig::default_multi_click_ms")]
    pub multi_click_ms: u64,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            multi_click_ms: Self::default_multi_click_ms(),
        }
    }
}

impl MouseConfig {
    const fn default_multi_click_ms() -> u64 {
        DEFAULT_MULTI_CLICK_MS
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub mouse: MouseConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path the settings were read from, if a file was found and parsed.
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

/// `./jot.toml` if present, else `<config dir>/jot/jot.toml`.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("jot").join(CONFIG_FILE_NAME);
    }
    local
}

/// Load settings from `path`, or from [`discover`] when `None`.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_not_found");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Wheel sensitivity clamped to `(0, 1]`. Non-positive or non-finite
    /// values fall back to the default.
    pub fn scroll_sensitivity(&self) -> f32 {
        let raw = self.file.scroll.sensitivity;
        let effective = if !raw.is_finite() || raw <= 0.0 {
            DEFAULT_SCROLL_SENSITIVITY
        } else {
            raw.min(1.0)
        };
        if effective != raw {
            info!(target: "config", raw, effective, "scroll_sensitivity_clamped");
        }
        effective
    }

    pub fn max_candidates(&self) -> usize {
        match self.file.completion.max_candidates {
            0 => DEFAULT_MAX_CANDIDATES,
            n => n,
        }
    }

    pub fn multi_click_window(&self) -> Duration {
        Duration::from_millis(self.file.mouse.multi_click_ms)
    }
}
