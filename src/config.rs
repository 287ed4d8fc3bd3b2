// ⚙️ Application Config - file locations and logging for the CLI
//
// Every field has a default, so an empty JSON object is a valid config.

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::DEFAULT_MAX_AGE_DAYS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// City reference data (CSV or JSON)
    pub cities_path: PathBuf,

    /// Researched location records (JSON map of name → record)
    pub locations_path: PathBuf,

    /// SQLite location cache
    pub cache_path: PathBuf,

    pub cache_max_age_days: i64,

    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            cities_path: PathBuf::from("data/cities.csv"),
            locations_path: PathBuf::from("data/locations.json"),
            cache_path: PathBuf::from("location_cache.db"),
            cache_max_age_days: DEFAULT_MAX_AGE_DAYS,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load from path when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Negative ages are treated as zero (always research)
    pub fn cache_max_age(&self) -> Duration {
        Duration::days(self.cache_max_age_days.max(0))
    }
}
