use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use specimen_core::DEFAULT_REPEAT_COUNT;

use crate::errors::ConfigError;

pub(crate) const MAX_DATE_SPAN_DAYS: i64 = 365 * 1000;

/// Options for the specimen engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Starting value of the shared, decreasing numeric counter.
    pub numeric_ceiling: u64,
    /// Elements generated for sequences without an explicit count.
    pub repeat_count: usize,
    /// Seed for identifier and date generators; random when unset.
    pub seed: Option<u64>,
    /// Reference date for generated dates; today (UTC) when unset.
    pub base_date: Option<NaiveDate>,
    /// Generated dates fall within this many days of `base_date`.
    pub date_span_days: i64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            numeric_ceiling: 256,
            repeat_count: DEFAULT_REPEAT_COUNT,
            seed: None,
            base_date: None,
            date_span_days: 730,
        }
    }
}

impl EngineOptions {
    /// Parses and validates options from TOML; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let options: EngineOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.numeric_ceiling < 2 {
            return Err(ConfigError::Invalid(
                "numeric_ceiling must be >= 2".to_string(),
            ));
        }
        if self.repeat_count == 0 {
            return Err(ConfigError::Invalid(
                "repeat_count must be > 0".to_string(),
            ));
        }
        if !(0..=MAX_DATE_SPAN_DAYS).contains(&self.date_span_days) {
            return Err(ConfigError::Invalid(format!(
                "date_span_days must be within 0..={MAX_DATE_SPAN_DAYS}"
            )));
        }
        Ok(())
    }
}
