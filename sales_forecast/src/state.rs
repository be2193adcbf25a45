//! Serialized snapshot handed from the training run to the dashboard
//!
//! The snapshot is overwritten wholesale by every training run and read once
//! when the dashboard starts.

use crate::aggregate::{Granularity, SalesSeries, SeriesKey};
use crate::config::ModelSettings;
use crate::data::LoadReport;
use crate::error::{ForecastError, Result};
use crate::evaluation::Evaluation;
use crate::models::{ForecastResult, ModelKind, SeasonalTrendFit};
use crate::overview::DatasetOverview;
use crate::profile::ColumnSummary;
use crate::scenario::Scenario;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Everything computed for one aggregated series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBundle {
    pub key: SeriesKey,
    pub history: SalesSeries,
    /// Seasonal trend forecast over the full history
    pub forecast: Option<ForecastResult>,
    pub fit: Option<SeasonalTrendFit>,
    /// Baseline forecasts over the full history
    pub baselines: Vec<ForecastResult>,
    pub evaluation: Option<Evaluation>,
    /// Reasons a forecast or evaluation is unavailable
    pub notices: Vec<String>,
}

impl SeriesBundle {
    pub fn new(history: SalesSeries) -> Self {
        Self {
            key: history.key().clone(),
            history,
            forecast: None,
            fit: None,
            baselines: Vec::new(),
            evaluation: None,
            notices: Vec::new(),
        }
    }

    /// Forecast of `model`, whether fitted or baseline
    pub fn forecast_for(&self, model: ModelKind) -> Option<&ForecastResult> {
        self.forecast
            .iter()
            .chain(self.baselines.iter())
            .find(|f| f.model() == model)
    }

    /// Forecast shown by default: the fitted model, else the first baseline available
    pub fn primary_forecast(&self) -> Option<&ForecastResult> {
        self.forecast.as_ref().or_else(|| self.baselines.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastState {
    pub created_at: DateTime<Utc>,
    pub granularity: Granularity,
    pub horizon: usize,
    pub settings: ModelSettings,
    pub scenarios: Vec<Scenario>,
    pub load_report: LoadReport,
    /// Column profile of the raw input, empty when profiling was skipped
    pub columns: Vec<ColumnSummary>,
    pub overview: Option<DatasetOverview>,
    pub series: Vec<SeriesBundle>,
}

impl ForecastState {
    /// Write the snapshot as JSON, replacing any previous file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec(self)?;
        // JSON has no encoding for NaN or infinity; serde_json writes them as null
        serde_json::from_slice::<ForecastState>(&bytes).map_err(|e| {
            ForecastError::DataError(format!(
                "state contains non-finite values and would not reload: {}",
                e
            ))
        })?;

        let tmp = tmp_path(path);
        if let Err(e) = write_and_rename(&tmp, path, &bytes) {
            if tmp.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp) {
                    warn!("Could not remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        info!(
            "Saved forecast state with {} series to {}",
            self.series.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a snapshot written by [`ForecastState::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForecastError::StateMissing(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let state: Self = serde_json::from_reader(reader)?;
        info!(
            "Loaded forecast state with {} series from {}",
            state.series.len(),
            path.display()
        );
        Ok(state)
    }

    pub fn bundle(&self, key: &SeriesKey) -> Option<&SeriesBundle> {
        self.series.iter().find(|b| &b.key == key)
    }

    pub fn overall(&self) -> Option<&SeriesBundle> {
        self.series.iter().find(|b| b.key.is_overall())
    }

    pub fn keys(&self) -> Vec<&SeriesKey> {
        self.series.iter().map(|b| &b.key).collect()
    }

    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        Scenario::find(&self.scenarios, name)
    }
}

fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(tmp)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    fs::rename(tmp, path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
