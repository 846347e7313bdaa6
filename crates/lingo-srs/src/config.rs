//! Configuration for the review scheduler.

use crate::models::{INITIAL_EASE_FACTOR, MIN_EASE_FACTOR};
use crate::{SrsError, SrsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,
    #[serde(default)]
    pub sm2: Sm2Config,
    #[serde(default)]
    pub stats: StatsThresholds,
}

fn default_upcoming_days() -> u32 { 7 }

impl Default for Config {
    fn default() -> Self {
        Self {
            upcoming_days: 7,
            sm2: Sm2Config::default(),
            stats: StatsThresholds::default(),
        }
    }
}

impl Config {
    /// Load from the platform config dir, falling back to defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), "ignoring config: {err}");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> SrsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self) -> SrsResult<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> SrsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "lingo-srs")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Parse and validate.
    pub fn from_toml_str(content: &str) -> SrsResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> SrsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SrsResult<()> {
        let sm2 = &self.sm2;
        if !(sm2.min_ease >= MIN_EASE_FACTOR) {
            return Err(invalid(format!(
                "min_ease must be at least {MIN_EASE_FACTOR}, got {}",
                sm2.min_ease
            )));
        }
        if !(sm2.initial_ease >= sm2.min_ease) {
            return Err(invalid(format!(
                "initial_ease {} is below min_ease {}",
                sm2.initial_ease, sm2.min_ease
            )));
        }
        if sm2.first_interval == 0 || sm2.second_interval == 0 {
            return Err(invalid("intervals must be at least one day".to_string()));
        }
        if !(sm2.hard_multiplier > 0.0) || !(sm2.easy_bonus > 0.0) {
            return Err(invalid("multipliers must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> SrsError {
    SrsError::InvalidConfig(message)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sm2Config {
    #[serde(default = "default_initial_ease")]
    pub initial_ease: f64,
    #[serde(default = "default_min_ease")]
    pub min_ease: f64,
    #[serde(default = "default_first_interval")]
    pub first_interval: u32,
    #[serde(default = "default_second_interval")]
    pub second_interval: u32,
    #[serde(default = "default_hard_multiplier")]
    pub hard_multiplier: f64,
    #[serde(default = "default_easy_bonus")]
    pub easy_bonus: f64,
}

fn default_initial_ease() -> f64 { INITIAL_EASE_FACTOR }
fn default_min_ease() -> f64 { MIN_EASE_FACTOR }
fn default_first_interval() -> u32 { 1 }
fn default_second_interval() -> u32 { 6 }
fn default_hard_multiplier() -> f64 { 1.2 }
fn default_easy_bonus() -> f64 { 1.3 }

impl Default for Sm2Config {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE_FACTOR,
            min_ease: MIN_EASE_FACTOR,
            first_interval: 1,
            second_interval: 6,
            hard_multiplier: 1.2,
            easy_bonus: 1.3,
        }
    }
}

/// Cut-offs used by retention statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsThresholds {
    #[serde(default = "default_mastered_repetitions")]
    pub mastered_repetitions: u32,
    #[serde(default = "default_mastered_ease")]
    pub mastered_ease: f64,
    #[serde(default = "default_struggling_ease")]
    pub struggling_ease: f64,
}

fn default_mastered_repetitions() -> u32 { 3 }
fn default_mastered_ease() -> f64 { 2.5 }
fn default_struggling_ease() -> f64 { 2.0 }

impl Default for StatsThresholds {
    fn default() -> Self {
        Self {
            mastered_repetitions: 3,
            mastered_ease: 2.5,
            struggling_ease: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_section() {
        let config = Config::from_toml_str(
            r#"
            upcoming_days = 14

            [sm2]
            easy_bonus = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.upcoming_days, 14);
        assert_eq!(config.sm2.easy_bonus, 1.5);
        assert_eq!(config.sm2.hard_multiplier, 1.2);
        assert_eq!(config.stats, StatsThresholds::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.stats.struggling_ease = 1.8;
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let low_min = Config::from_toml_str("[sm2]\nmin_ease = 0.5\n");
        assert!(matches!(low_min, Err(SrsError::InvalidConfig(_))));

        let below_floor = Config::from_toml_str("[sm2]\nmin_ease = 1.0\n");
        assert!(matches!(below_floor, Err(SrsError::InvalidConfig(_))));

        let zero_step = Config::from_toml_str("[sm2]\nsecond_interval = 0\n");
        assert!(matches!(zero_step, Err(SrsError::InvalidConfig(_))));

        let bad_bonus = Config::from_toml_str("[sm2]\neasy_bonus = -1.0\n");
        assert!(matches!(bad_bonus, Err(SrsError::InvalidConfig(_))));

        let initial_below_min = Config::from_toml_str("[sm2]\ninitial_ease = 1.2\n");
        assert!(matches!(initial_below_min, Err(SrsError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = Config::from_toml_str("upcoming_days = \"soon\"");
        assert!(matches!(result, Err(SrsError::ConfigParse(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.upcoming_days = 3;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(SrsError::Io(_))));
    }
}
