//! Battlefield configuration.
//!
//! All fields have defaults, so a JSON document only needs to name what it
//! overrides:
//!
//! ```
//! use skirmish_core::config::BattlefieldConfig;
//!
//! let config = BattlefieldConfig::from_json(r#"{ "tick_ms": 20 }"#).unwrap();
//! assert_eq!(config.tick_ms, 20);
//! assert_eq!(config.max_path_expansions, 4096);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use waypoint::{PathfinderConfig, DEFAULT_MAX_EXPANSIONS};

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for [`BattlefieldConfig`].
    #[error("invalid battlefield config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Tuning for a [`crate::battlefield::Battlefield`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattlefieldConfig {
    /// Length of one [`crate::battlefield::Battlefield::step`] in milliseconds.
    pub tick_ms: u32,
    /// Pathfinder expansion budget per search.
    pub max_path_expansions: usize,
    /// Projectile flight speed in map units per second.
    pub projectile_speed: f32,
    /// Distance at which a projectile counts as a hit.
    pub projectile_hit_radius: f32,
    /// Lifetime of visual effects such as heal sparkles.
    pub static_effect_ms: u32,
}

impl Default for BattlefieldConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            max_path_expansions: DEFAULT_MAX_EXPANSIONS,
            projectile_speed: 8.0,
            projectile_hit_radius: 0.3,
            static_effect_ms: 500,
        }
    }
}

impl BattlefieldConfig {
    /// Parse a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Set the tick length.
    #[must_use]
    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Set the pathfinder expansion budget.
    #[must_use]
    pub fn with_max_path_expansions(mut self, max_path_expansions: usize) -> Self {
        self.max_path_expansions = max_path_expansions;
        self
    }

    /// Pathfinder settings derived from this configuration.
    #[must_use]
    pub fn pathfinder(&self) -> PathfinderConfig {
        PathfinderConfig {
            max_expansions: self.max_path_expansions,
        }
    }
}
