//! Settings file and path resolution.
//!
//! Settings live in `celebration.json`, looked up in:
//! 1. `--config-dir` CLI argument
//! 2. `CELEBRATION_CONFIG_DIR` environment variable
//! 3. Current folder, if it already contains `celebration.json`
//! 4. Platform config directory from dirs-next (`~/.config/celebration` on Linux)
//!
//! A missing file is not an error: defaults apply.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::photo::{DEFAULT_FALLBACK_TRACK, DEFAULT_PLACEHOLDER_TEMPLATE};

pub const SETTINGS_FILE: &str = "celebration.json";
pub const LOG_FILE: &str = "celebration.log";
const APP_DIR: &str = "celebration";

/// Overrides for default application paths
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Priority: CLI args → ENV var (CELEBRATION_CONFIG_DIR) → None
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| {
            std::env::var("CELEBRATION_CONFIG_DIR")
                .ok()
                .map(PathBuf::from)
        });
        Self { config_dir }
    }
}

/// Path to a file in the config directory
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    config_dir(config).join(name)
}

fn config_dir(config: &PathConfig) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(cwd) = std::env::current_dir() {
        if cwd.join(SETTINGS_FILE).exists() {
            return cwd;
        }
    }

    dirs_next::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Persisted settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Server
    pub port: u16,
    pub bind_address: String,
    pub media_dir: PathBuf,
    pub index_file: Option<PathBuf>,

    // Preview client
    pub server_url: String,
    pub placeholder_template: String,
    pub fallback_track: String,
    pub default_volume: f32, // 0-100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            media_dir: PathBuf::from("public"),
            index_file: Some(PathBuf::from("index.html")),
            server_url: "http://localhost:3000".to_string(),
            placeholder_template: DEFAULT_PLACEHOLDER_TEMPLATE.to_string(),
            fallback_track: DEFAULT_FALLBACK_TRACK.to_string(),
            default_volume: 70.0,
        }
    }
}

impl Settings {
    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    /// `PORT` from the environment wins over the file
    pub fn apply_env(&mut self) {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
