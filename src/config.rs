// SPDX-License-Identifier: MPL-2.0
//! Loading and saving of user preferences to a `settings.toml` file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Glance";

/// Wheel step applied per scroll notch (zoom in multiplies by this,
/// zoom out divides).
pub const DEFAULT_WHEEL_ZOOM_FACTOR: f64 = 1.1;

/// Quiescence window after the last zoom before the renderer switches
/// back to high-quality resampling.
pub const DEFAULT_SMOOTHING_DELAY_MS: u64 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub language: Option<String>,
    /// Move the window to the best-matching display after each load.
    #[serde(default)]
    pub auto_move: Option<bool>,
    #[serde(default)]
    pub wheel_zoom_factor: Option<f64>,
    #[serde(default)]
    pub smoothing_delay_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            auto_move: Some(true),
            wheel_zoom_factor: Some(DEFAULT_WHEEL_ZOOM_FACTOR),
            smoothing_delay_ms: Some(DEFAULT_SMOOTHING_DELAY_MS),
        }
    }
}

impl Config {
    pub fn auto_move(&self) -> bool {
        self.auto_move.unwrap_or(true)
    }

    /// Wheel zoom factor, clamped away from degenerate values so a bad
    /// config cannot freeze or invert zooming.
    pub fn wheel_zoom_factor(&self) -> f64 {
        self.wheel_zoom_factor
            .filter(|f| f.is_finite() && *f > 1.0)
            .unwrap_or(DEFAULT_WHEEL_ZOOM_FACTOR)
    }

    pub fn smoothing_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(
            self.smoothing_delay_ms.unwrap_or(DEFAULT_SMOOTHING_DELAY_MS),
        )
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
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_fields() {
        let config = Config {
            language: Some("zh-CN".to_string()),
            auto_move: Some(false),
            wheel_zoom_factor: Some(1.25),
            smoothing_delay_ms: Some(200),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.language, config.language);
        assert_eq!(loaded.auto_move, config.auto_move);
        assert_eq!(loaded.wheel_zoom_factor, config.wheel_zoom_factor);
        assert_eq!(loaded.smoothing_delay_ms, config.smoothing_delay_ms);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not [valid toml").expect("failed to write file");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded.language, None);
        assert_eq!(loaded.auto_move, Some(true));
    }

    #[test]
    fn wheel_zoom_factor_rejects_degenerate_values() {
        let mut config = Config::default();
        config.wheel_zoom_factor = Some(0.0);
        assert_eq!(config.wheel_zoom_factor(), DEFAULT_WHEEL_ZOOM_FACTOR);

        config.wheel_zoom_factor = Some(1.0);
        assert_eq!(config.wheel_zoom_factor(), DEFAULT_WHEEL_ZOOM_FACTOR);

        config.wheel_zoom_factor = Some(1.5);
        assert_eq!(config.wheel_zoom_factor(), 1.5);
    }

    #[test]
    fn smoothing_delay_defaults_to_reference_value() {
        let config = Config {
            smoothing_delay_ms: None,
            ..Config::default()
        };
        assert_eq!(config.smoothing_delay().as_millis(), 120);
    }
}
