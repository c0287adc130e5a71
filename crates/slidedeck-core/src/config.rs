//! Editor tuning values.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Distance (in slide units) within which an edge snaps to a guide.
pub const SNAP_TOLERANCE: f64 = 15.0;
/// Maximum number of snapshots kept in history.
pub const MAX_HISTORY: usize = 40;
/// Arrow-key nudge distance.
pub const NUDGE_STEP: f64 = 1.0;
/// Arrow-key nudge distance with the modifier held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;
/// Smallest size a text element may be resized to.
pub const MIN_TEXT_SIZE: Size = Size::new(20.0, 20.0);
/// Smallest size an image or chart may be resized to.
pub const MIN_MEDIA_SIZE: Size = Size::new(30.0, 30.0);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunable editor behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Snap distance in slide units (inclusive).
    pub snap_tolerance: f64,
    /// History cap.
    pub max_history: usize,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    /// Resize floor for text elements.
    pub min_text_size: Size,
    /// Resize floor for images and charts.
    pub min_media_size: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: SNAP_TOLERANCE,
            max_history: MAX_HISTORY,
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
            min_text_size: MIN_TEXT_SIZE,
            min_media_size: MIN_MEDIA_SIZE,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.snap_tolerance.is_finite() && self.snap_tolerance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "snapTolerance",
                reason: format!("expected a non-negative number, got {}", self.snap_tolerance),
            });
        }
        if self.max_history == 0 {
            return Err(ConfigError::Invalid {
                field: "maxHistory",
                reason: "history must keep at least one snapshot".to_string(),
            });
        }
        for (field, step) in [
            ("nudgeStep", self.nudge_step),
            ("nudgeStepLarge", self.nudge_step_large),
        ] {
            if !(step.is_finite() && step > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive number, got {}", step),
                });
            }
        }
        for (field, size) in [
            ("minTextSize", self.min_text_size),
            ("minMediaSize", self.min_media_size),
        ] {
            if !(size.width.is_finite() && size.height.is_finite())
                || size.width < 0.0
                || size.height < 0.0
            {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative size, got {:?}", size),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.snap_tolerance, 15.0);
        assert_eq!(config.max_history, 40);
        assert_eq!(config.nudge_step, 1.0);
        assert_eq!(config.nudge_step_large, 10.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "snapTolerance": 8 }"#).unwrap();
        assert_eq!(config.snap_tolerance, 8.0);
        assert_eq!(config.max_history, MAX_HISTORY);
        assert_eq!(config.min_media_size, MIN_MEDIA_SIZE);
    }

    #[test]
    fn test_rejects_zero_history() {
        let err = EditorConfig::from_json(r#"{ "maxHistory": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "maxHistory", .. }));
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let err = EditorConfig::from_json(r#"{ "snapTolerance": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "snapTolerance", .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = EditorConfig {
            nudge_step_large: 25.0,
            ..EditorConfig::default()
        };
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = EditorConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
