//! Configuration file support for Titan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/titan/config.toml`.
//! Every section is optional and falls back to the documented defaults.

use crate::{Error, ExerciseDefinition, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the durable workout store inside the data directory
pub const STORE_FILE_NAME: &str = "titan_db.json";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub estimator: EstimatorConfig,

    #[serde(default)]
    pub exercises: ExercisesConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

/// Athlete body measurements
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_weight_kg")]
    pub weight_kg: f64,

    #[serde(default = "default_height_m")]
    pub height_m: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            weight_kg: default_weight_kg(),
            height_m: default_height_m(),
        }
    }
}

/// Calorie formula parameters
///
/// Strength sets have no measured duration, so each set counts as
/// `minutes_per_set` minutes. Sets with more than `high_rep_threshold` reps
/// are stretched by `high_rep_factor`; a factor of 1.0 turns the penalty off.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EstimatorConfig {
    #[serde(default = "default_minutes_per_set")]
    pub minutes_per_set: f64,

    #[serde(default = "default_high_rep_threshold")]
    pub high_rep_threshold: u32,

    #[serde(default = "default_high_rep_factor")]
    pub high_rep_factor: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            minutes_per_set: default_minutes_per_set(),
            high_rep_threshold: default_high_rep_threshold(),
            high_rep_factor: default_high_rep_factor(),
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.minutes_per_set.is_finite() && self.minutes_per_set > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "minutes_per_set must be positive, got {}",
                self.minutes_per_set
            )));
        }
        if !(self.high_rep_factor.is_finite() && self.high_rep_factor >= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "high_rep_factor must be at least 1.0, got {}",
                self.high_rep_factor
            )));
        }
        Ok(())
    }
}

/// User-defined exercises appended to the built-in catalog
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExercisesConfig {
    #[serde(default)]
    pub custom: Vec<ExerciseDefinition>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("titan")
}

fn default_weight_kg() -> f64 {
    75.0
}

fn default_height_m() -> f64 {
    1.75
}

fn default_minutes_per_set() -> f64 {
    2.5
}

fn default_high_rep_threshold() -> u32 {
    12
}

fn default_high_rep_factor() -> f64 {
    1.2
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("titan").join("config.toml")
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if !(self.profile.weight_kg.is_finite() && self.profile.weight_kg > 0.0) {
            return Err(Error::Config(format!(
                "profile.weight_kg must be positive, got {}",
                self.profile.weight_kg
            )));
        }
        if !(self.profile.height_m.is_finite() && self.profile.height_m > 0.0) {
            return Err(Error::Config(format!(
                "profile.height_m must be positive, got {}",
                self.profile.height_m
            )));
        }
        self.estimator
            .validate()
            .map_err(|e| Error::Config(format!("[estimator] {}", e)))?;

        let errors = crate::ExerciseCatalog::default()
            .with_custom(self.exercises.custom.iter().cloned())
            .validate();
        if !errors.is_empty() {
            return Err(Error::Config(format!(
                "[exercises] {}",
                errors.join("; ")
            )));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
