// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, loading and saving the
//! process-wide toast defaults to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use toast_relay::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration and install it as the toast defaults
//! let config = config::load().unwrap_or_default();
//! config.apply();
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded.fade_in_ms, config.fade_in_ms);
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

use crate::domain::toast::Opacity;
use crate::error::Result;
use crate::toast::ToastDefaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "ToastRelay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub content_opacity: Option<f32>,
    #[serde(default)]
    pub fade_in_ms: Option<u64>,
    #[serde(default)]
    pub fade_out_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_opacity: Some(DEFAULT_CONTENT_OPACITY),
            fade_in_ms: Some(DEFAULT_FADE_IN_MS),
            fade_out_ms: Some(DEFAULT_FADE_OUT_MS),
        }
    }
}

impl Config {
    /// Converts the settings into toast defaults, filling gaps with the
    /// built-in values and clamping fades to [`MAX_FADE_MS`].
    #[must_use]
    pub fn toast_defaults(&self) -> ToastDefaults {
        let fade = |ms: Option<u64>, fallback: u64| {
            Duration::from_millis(ms.unwrap_or(fallback).min(MAX_FADE_MS))
        };
        ToastDefaults {
            content_opacity: Opacity::new(self.content_opacity.unwrap_or(DEFAULT_CONTENT_OPACITY)),
            fade_in: fade(self.fade_in_ms, DEFAULT_FADE_IN_MS),
            fade_out: fade(self.fade_out_ms, DEFAULT_FADE_OUT_MS),
        }
    }

    /// Installs these settings as the defaults for newly constructed toasts.
    pub fn apply(&self) {
        self.toast_defaults().install();
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::warn!("ignoring invalid settings file {}: {err}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
