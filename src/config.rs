use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::classifier::GestureConfig;
use crate::debounce::DebounceConfig;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    pub gesture: GestureConfig,
    pub debounce: DebounceSettings,
    pub calculator: CalculatorSettings,
    pub tracking: TrackingConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub mirror_mode: bool,
    pub show_landmarks: bool,
    pub show_instructions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceSettings {
    pub confirm_after_ms: u64,
    pub clear_hold_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    pub history_limit: usize,
    /// Entries drawn under the display.
    pub history_shown: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub model_path: PathBuf,
    /// Hand presence score below which a frame counts as no hand.
    pub min_presence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub menu_scale: usize,
    pub landmark_dot_size: usize,
    pub landmark_color_hex: String, // e.g. "#00FF00"
    pub accent_color_hex: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            mirror_mode: true,
            show_landmarks: true,
            show_instructions: true,
        }
    }
}

impl Default for DebounceSettings {
    fn default() -> Self {
        let d = DebounceConfig::default();
        Self {
            confirm_after_ms: d.confirm_after.as_millis() as u64,
            clear_hold_ms: d.clear_hold.as_millis() as u64,
        }
    }
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            history_limit: 10,
            history_shown: 3,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/hand_landmark.onnx"),
            min_presence: 0.5,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            menu_scale: 2,
            landmark_dot_size: 3,
            landmark_color_hex: "#00FF00".to_string(),
            accent_color_hex: "#FFD400".to_string(),
        }
    }
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "config.json";

    /// Read a config without touching the file. Missing or unparsable files
    /// give the defaults.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Configuration file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        // Missing fields fall back to Default through #[serde(default)].
        match serde_json::from_str::<AppConfig>(&content) {
            Ok(c) => {
                info!("Loaded configuration from {}", path.display());
                Ok(c)
            }
            Err(e) => {
                warn!("Error parsing config {}: {}. Loading defaults.", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Read, then write back so new fields show up in the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::read(path)?;
        config.save_to(path)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn debounce(&self) -> DebounceConfig {
        DebounceConfig {
            confirm_after: Duration::from_millis(self.debounce.confirm_after_ms),
            clear_hold: Duration::from_millis(self.debounce.clear_hold_ms),
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            gesture: self.gesture.clone(),
            debounce: self.debounce(),
            history_limit: self.calculator.history_limit,
            history_shown: self.calculator.history_shown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "debounce": { "confirm_after_ms": 250 } }"#).expect("write");

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.debounce.confirm_after_ms, 250);
        assert_eq!(config.debounce.clear_hold_ms, 1000);
        assert_eq!(config.calculator.history_limit, 10);

        // Written back with every field present.
        let written = fs::read_to_string(&path).expect("read");
        assert!(written.contains("clear_hold_ms"));
        assert!(written.contains("finger_extension_ratio"));
    }

    #[test]
    fn test_bad_json_falls_back_to_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("write");
        let config = AppConfig::read(&path).expect("read");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_session_config_conversion() {
        let mut config = AppConfig::default();
        config.debounce.clear_hold_ms = 1500;
        config.calculator.history_limit = 4;
        let session = config.session();
        assert_eq!(session.debounce.clear_hold, Duration::from_millis(1500));
        assert_eq!(session.debounce.confirm_after, Duration::from_millis(400));
        assert_eq!(session.history_limit, 4);
    }
}
