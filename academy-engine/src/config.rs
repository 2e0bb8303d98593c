//! Tunable progression settings.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::XP_PER_LEVEL;
use crate::stats::{PlayerStats, level_for_xp};

/// Errors raised when progression configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("xp_per_level must be at least 1 (got {0})")]
    ZeroXpPerLevel(u32),
    #[error("initial level {level} does not match {xp} xp (expected {expected})")]
    InconsistentLevel { xp: u32, level: u32, expected: u32 },
}

/// Progression settings loaded alongside the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "ProgressionConfig::default_xp_per_level")]
    pub xp_per_level: u32,
    #[serde(default)]
    pub initial_stats: PlayerStats,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: Self::default_xp_per_level(),
            initial_stats: PlayerStats::default(),
        }
    }
}

impl ProgressionConfig {
    const fn default_xp_per_level() -> u32 {
        XP_PER_LEVEL
    }

    /// Load configuration from a JSON string, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the level invariant holds for the starting stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the level size is zero or the starting level
    /// disagrees with the starting XP.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.xp_per_level == 0 {
            return Err(ConfigError::ZeroXpPerLevel(self.xp_per_level));
        }
        let expected = level_for_xp(self.initial_stats.xp, self.xp_per_level);
        if self.initial_stats.level != expected {
            return Err(ConfigError::InconsistentLevel {
                xp: self.initial_stats.xp,
                level: self.initial_stats.level,
                expected,
            });
        }
        Ok(())
    }
}
