//! Configuration for training and serving
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! yields a working configuration for the Superstore-style dataset layout.

use crate::aggregate::{Dimension, Granularity};
use crate::error::{ForecastError, Result};
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ForecastConfig {
    pub data: DataSettings,
    pub aggregation: AggregationSettings,
    pub model: ModelConfig,
    pub scenarios: Vec<Scenario>,
    pub state: StateSettings,
    pub dashboard: DashboardSettings,
}

/// Where transactions come from and how to read them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub path: PathBuf,
    pub date_formats: Vec<String>,
    pub columns: ColumnNames,
}

/// Header names for each transaction field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub category: String,
    pub region: Option<String>,
    pub store: Option<String>,
    pub segment: Option<String>,
    pub sales: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    pub granularity: Granularity,
    pub dimensions: Vec<Dimension>,
}

/// Model parameters as written in the config file.
///
/// Window and season length default per granularity, see [`ModelConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub moving_average_window: Option<usize>,
    pub season_length: Option<usize>,
    pub test_periods: usize,
    pub interval_width: f64,
}

/// Model parameters after granularity defaults are applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub moving_average_window: usize,
    pub season_length: usize,
    pub test_periods: usize,
    pub interval_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub host: String,
    pub port: u16,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/train.csv"),
            date_formats: ["%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            columns: ColumnNames::default(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Order Date".to_string(),
            category: "Category".to_string(),
            region: Some("Region".to_string()),
            store: None,
            segment: Some("Segment".to_string()),
            sales: "Sales".to_string(),
        }
    }
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            granularity: Granularity::Monthly,
            dimensions: vec![Dimension::Category, Dimension::Region],
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            moving_average_window: None,
            season_length: None,
            test_periods: 6,
            interval_width: 0.8,
        }
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("store/state_dump.json"),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl ModelConfig {
    /// Fill in granularity-dependent defaults
    pub fn resolve(&self, granularity: Granularity) -> ModelSettings {
        ModelSettings {
            moving_average_window: self
                .moving_average_window
                .unwrap_or_else(|| granularity.default_moving_average_window()),
            season_length: self
                .season_length
                .unwrap_or_else(|| granularity.default_season_length()),
            test_periods: self.test_periods,
            interval_width: self.interval_width,
        }
    }
}

impl ModelSettings {
    pub fn validate(&self) -> Result<()> {
        if self.moving_average_window == 0 {
            return Err(ForecastError::ConfigError(
                "moving_average_window must be greater than zero".to_string(),
            ));
        }
        if self.season_length == 0 {
            return Err(ForecastError::ConfigError(
                "season_length must be greater than zero".to_string(),
            ));
        }
        if self.test_periods == 0 {
            return Err(ForecastError::ConfigError(
                "test_periods must be greater than zero".to_string(),
            ));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "interval_width must be within (0, 1), got {}",
                self.interval_width
            )));
        }
        Ok(())
    }
}

impl ForecastConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        if config.scenarios.is_empty() {
            config.scenarios = Scenario::defaults();
        }
        config.validate()?;
        Ok(config)
    }

    /// Model settings with granularity defaults applied
    pub fn model_settings(&self) -> ModelSettings {
        self.model.resolve(self.aggregation.granularity)
    }

    /// Scenarios to offer, falling back to the built-in set
    pub fn scenarios(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            Scenario::defaults()
        } else {
            self.scenarios.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.model_settings().validate()?;

        if self.data.date_formats.is_empty() {
            return Err(ForecastError::ConfigError(
                "at least one date format is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !seen.insert(scenario.name.to_lowercase()) {
                return Err(ForecastError::ConfigError(format!(
                    "duplicate scenario name '{}'",
                    scenario.name
                )));
            }
        }

        if self.aggregation.dimensions.contains(&Dimension::Overall) {
            return Err(ForecastError::ConfigError(
                "the overall series is always produced and cannot be listed as a dimension"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
