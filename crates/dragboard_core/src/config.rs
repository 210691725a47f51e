//! Board tuning configuration.
//!
//! # Responsibility
//! - Hold the tunable thresholds used by hit-testing, measurement and
//!   drag autoscroll.
//! - Load and validate configuration from JSON.
//!
//! # Invariants
//! - A `BoardConfig` returned by a loader has passed `validate()`.
//! - Missing JSON fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_EDGE_THRESHOLD: f64 = 35.0;
pub const DEFAULT_MEASURE_TIMEOUT_MS: u64 = 300;
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 50.0;
pub const DEFAULT_SCROLL_STEP: f64 = 8.0;
pub const DEFAULT_DRAG_SPEED_FACTOR: f64 = 1.0;

/// Tunables for one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Vertical enlargement of a column's hit band on both edges.
    pub edge_threshold: f64,
    /// Upper bound for a single anchor measurement.
    pub measure_timeout_ms: u64,
    /// Distance from the viewport's side edges that triggers autoscroll.
    pub x_scroll_threshold: f64,
    /// Vertical offset applied to the floating hover frame.
    pub y_scroll_threshold: f64,
    /// Board scroll advance per autoscroll step.
    pub scroll_step: f64,
    /// Multiplier (rightward) / divisor (leftward) for autoscroll offsets.
    pub drag_speed_factor: f64,
    /// Whether columns are laid out horizontally.
    pub horizontal: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            measure_timeout_ms: DEFAULT_MEASURE_TIMEOUT_MS,
            x_scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            y_scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            scroll_step: DEFAULT_SCROLL_STEP,
            drag_speed_factor: DEFAULT_DRAG_SPEED_FACTOR,
            horizontal: true,
        }
    }
}

impl BoardConfig {
    pub fn measure_timeout(&self) -> Duration {
        Duration::from_millis(self.measure_timeout_ms)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Read(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative(self.edge_threshold, "edge_threshold")?;
        require_non_negative(self.x_scroll_threshold, "x_scroll_threshold")?;
        require_non_negative(self.y_scroll_threshold, "y_scroll_threshold")?;
        if self.measure_timeout_ms == 0 {
            return Err(ConfigError::ZeroMeasureTimeout);
        }
        require_positive(self.scroll_step, "scroll_step")?;
        require_positive(self.drag_speed_factor, "drag_speed_factor")?;
        Ok(())
    }
}

/// Configuration loading/validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File could not be read.
    Read(String),
    /// Document is not valid JSON for `BoardConfig`.
    Parse(String),
    /// Field must be finite and `>= 0`.
    Negative(&'static str),
    /// Field must be finite and `> 0`.
    NotPositive(&'static str),
    /// `measure_timeout_ms` must be non-zero so measurement stays bounded
    /// but can still succeed.
    ZeroMeasureTimeout,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(message) => write!(f, "failed to read board config: {message}"),
            Self::Parse(message) => write!(f, "invalid board config: {message}"),
            Self::Negative(field) => write!(f, "`{field}` must be a finite value >= 0"),
            Self::NotPositive(field) => write!(f, "`{field}` must be a finite value > 0"),
            Self::ZeroMeasureTimeout => write!(f, "`measure_timeout_ms` must be > 0"),
        }
    }
}

impl Error for ConfigError {}

fn require_non_negative(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative(field))
    }
}

fn require_positive(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive(field))
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError};
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn defaults_match_board_constants() {
        let config = BoardConfig::default();
        assert_eq!(config.edge_threshold, 35.0);
        assert_eq!(config.measure_timeout(), Duration::from_millis(300));
        assert_eq!(config.scroll_step, 8.0);
        assert!(config.horizontal);
        config.validate().expect("defaults should be valid");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = BoardConfig::from_json_str(r#"{ "edge_threshold": 20 }"#)
            .expect("partial config should parse");
        assert_eq!(config.edge_threshold, 20.0);
        assert_eq!(config.measure_timeout_ms, 300);
    }

    #[test]
    fn rejects_invalid_fields() {
        let err = BoardConfig::from_json_str(r#"{ "edge_threshold": -1 }"#)
            .expect_err("negative threshold must be rejected");
        assert_eq!(err, ConfigError::Negative("edge_threshold"));

        let err = BoardConfig::from_json_str(r#"{ "measure_timeout_ms": 0 }"#)
            .expect_err("zero timeout must be rejected");
        assert_eq!(err, ConfigError::ZeroMeasureTimeout);

        let err = BoardConfig::from_json_str(r#"{ "drag_speed_factor": 0 }"#)
            .expect_err("zero speed factor must be rejected");
        assert_eq!(err, ConfigError::NotPositive("drag_speed_factor"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = BoardConfig::from_json_str("{ not json").expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"{ "scroll_step": 16, "horizontal": false }"#)
            .expect("write config");

        let config = BoardConfig::from_json_file(file.path()).expect("config file should load");
        assert_eq!(config.scroll_step, 16.0);
        assert!(!config.horizontal);
    }

    #[test]
    fn missing_file_reports_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = BoardConfig::from_json_file(dir.path().join("absent.json"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
