//! Scheduler configuration
//!
//! Loaded from a flat TOML table, e.g. `glint.toml`:
//!
//! ```toml
//! target_fps = 60
//! background_fps = 120
//! warn_on_missing_effect = true
//! max_frame_delta = 0.25
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse effects config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid effects config: {0}")]
    Invalid(String),
}

/// Tunables for [`EffectScheduler`](crate::EffectScheduler)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EffectsConfig {
    /// Expected host frame rate; `1 / target_fps` is the frame delta used
    /// for step sizes before the first tick is observed
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,

    /// Pump rate of the optional background thread
    #[serde(default = "default_background_fps")]
    pub background_fps: u32,

    /// Log a warning when removing an effect that is not registered
    #[serde(default = "default_true")]
    pub warn_on_missing_effect: bool,

    /// Upper bound applied to wall-clock deltas measured by `tick()`
    #[serde(default)]
    pub max_frame_delta: Option<f32>,
}

fn default_target_fps() -> u32 {
    60
}

fn default_background_fps() -> u32 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            background_fps: default_background_fps(),
            warn_on_missing_effect: true,
            max_frame_delta: None,
        }
    }
}

impl EffectsConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EffectsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be positive".into()));
        }
        if self.background_fps == 0 {
            return Err(ConfigError::Invalid(
                "background_fps must be positive".into(),
            ));
        }
        if let Some(max) = self.max_frame_delta {
            if !(max.is_finite() && max > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "max_frame_delta must be a positive number of seconds, got {max}"
                )));
            }
        }
        Ok(())
    }

    /// Frame delta in seconds implied by `target_fps`
    pub fn default_frame_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = EffectsConfig::from_toml_str("").unwrap();
        assert_eq!(config, EffectsConfig::default());
        assert_eq!(config.target_fps, 60);
        assert!(config.warn_on_missing_effect);
    }

    #[test]
    fn test_parse_overrides() {
        let config = EffectsConfig::from_toml_str(
            r#"
            target_fps = 30
            warn_on_missing_effect = false
            max_frame_delta = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.background_fps, 120);
        assert!(!config.warn_on_missing_effect);
        assert_eq!(config.max_frame_delta, Some(0.5));
        assert!((config.default_frame_delta() - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_zero_fps() {
        let err = EffectsConfig::from_toml_str("target_fps = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_frame_delta() {
        let err = EffectsConfig::from_toml_str("max_frame_delta = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = EffectsConfig::from_toml_str("target_fps = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EffectsConfig::load(Path::new("/nonexistent/glint.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
