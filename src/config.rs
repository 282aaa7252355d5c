//! Engine configuration.
//!
//! All settings have defaults; embedders override them from JSON.
//!
//! # Examples
//!
//! ```
//! use kanban_sync::config::KanbanConfig;
//!
//! let config = KanbanConfig::from_json_str(r#"{ "repeat_catch_up": true }"#)
//!     .expect("valid configuration");
//! assert!(config.repeat_catch_up);
//! assert_eq!(config.link_share_display_name, "Shared via link");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid kanban configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The position spacing is zero, negative or not finite.
    #[error("position spacing must be a positive finite number, got {0}")]
    InvalidPositionSpacing(f64),
}

/// Tunable behaviour of the board engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    /// Multiplier applied to a new bucket's ID to derive its default
    /// position.
    pub position_spacing: f64,
    /// Name shown for link shares that have none.
    pub link_share_display_name: String,
    /// Roll overdue interval recurrences forward past the current time
    /// instead of advancing them exactly once.
    pub repeat_catch_up: bool,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            position_spacing: 1000.0,
            link_share_display_name: String::from("Shared via link"),
            repeat_catch_up: false,
        }
    }
}

impl KanbanConfig {
    /// Default configuration with overdue recurrences rolled forward.
    #[must_use]
    pub fn catch_up() -> Self {
        Self {
            repeat_catch_up: true,
            ..Self::default()
        }
    }

    /// Parses a JSON document; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidPositionSpacing`] for an unusable spacing.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPositionSpacing`] when the spacing is not
    /// a positive finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.position_spacing.is_finite() || self.position_spacing <= 0.0 {
            return Err(ConfigError::InvalidPositionSpacing(self.position_spacing));
        }
        Ok(())
    }
}
