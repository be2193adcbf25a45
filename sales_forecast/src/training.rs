//! Offline training run: load, aggregate, evaluate, forecast and snapshot

use crate::aggregate::{aggregate, SalesSeries};
use crate::config::{ForecastConfig, ModelSettings};
use crate::data::{DataLoader, TransactionSet};
use crate::error::Result;
use crate::evaluation::{evaluate, fit_and_forecast};
use crate::models::{
    ForecastModel, MovingAverage, Naive, SeasonalNaive, SeasonalTrend, TrainedForecastModel,
    FORECAST_HORIZON,
};
use crate::overview::DatasetOverview;
use crate::profile::profile_csv;
use crate::state::{ForecastState, SeriesBundle};
use chrono::Utc;
use log::{info, warn};
use std::path::Path;

/// Runs the full training phase for one configuration
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: ForecastConfig,
}

impl TrainingPipeline {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Load transactions from `path`, profile the file and train
    pub fn run_from_path<P: AsRef<Path>>(&self, path: P) -> Result<ForecastState> {
        let path = path.as_ref();
        let set = DataLoader::from_csv(path, &self.config.data)?;

        let columns = match profile_csv(path) {
            Ok(columns) => columns,
            Err(e) => {
                warn!("Column profile of {} failed: {}", path.display(), e);
                Vec::new()
            }
        };

        let mut state = self.run(&set)?;
        state.columns = columns;
        Ok(state)
    }

    /// Train every series derived from `set`
    pub fn run(&self, set: &TransactionSet) -> Result<ForecastState> {
        let settings = self.config.model_settings();
        settings.validate()?;
        let granularity = self.config.aggregation.granularity;

        let series = aggregate(set, granularity, &self.config.aggregation.dimensions)?;
        info!(
            "Training {} {} series (window {}, season {}, holdout {})",
            series.len(),
            granularity,
            settings.moving_average_window,
            settings.season_length,
            settings.test_periods
        );

        let bundles = series
            .into_iter()
            .map(|s| train_series(s, &settings))
            .collect::<Result<Vec<_>>>()?;

        let overview = match DatasetOverview::from_transactions(set) {
            Ok(overview) => Some(overview),
            Err(e) => {
                warn!("Dataset overview unavailable: {}", e);
                None
            }
        };

        Ok(ForecastState {
            created_at: Utc::now(),
            granularity,
            horizon: FORECAST_HORIZON,
            settings,
            scenarios: self.config.scenarios(),
            load_report: set.report().clone(),
            columns: Vec::new(),
            overview,
            series: bundles,
        })
    }
}

fn train_series(history: SalesSeries, settings: &ModelSettings) -> Result<SeriesBundle> {
    let mut notices = Vec::new();

    let evaluation = match evaluate(&history, settings) {
        Ok(evaluation) => {
            if let Some(best) = evaluation.best_by_mae() {
                info!(
                    "{}: best model by MAE is {} ({:.2})",
                    history.key(),
                    best.model,
                    best.mae
                );
            }
            Some(evaluation)
        }
        Err(e) => {
            warn!("{}: evaluation skipped: {}", history.key(), e);
            notices.push(format!("Model comparison unavailable: {}", e));
            None
        }
    };

    if history.len() < settings.season_length {
        notices.push(format!(
            "Seasonal naive repeats the last value: {} periods is less than one cycle of {}",
            history.len(),
            settings.season_length
        ));
    }
    let baselines = vec![
        fit_and_forecast(&Naive, &history, FORECAST_HORIZON)?,
        fit_and_forecast(
            &MovingAverage::new(settings.moving_average_window)?,
            &history,
            FORECAST_HORIZON,
        )?,
        fit_and_forecast(
            &SeasonalNaive::new(settings.season_length)?,
            &history,
            FORECAST_HORIZON,
        )?,
    ];

    let fitted = SeasonalTrend::new(settings.season_length, settings.interval_width)?
        .train(&history)
        .and_then(|trained| {
            let forecast = trained.forecast(FORECAST_HORIZON)?;
            Ok((forecast, trained.into_fit()))
        });
    let (forecast, fit) = match fitted {
        Ok((forecast, fit)) => (Some(forecast), Some(fit)),
        Err(e) => {
            warn!("{}: seasonal trend fit failed: {}", history.key(), e);
            notices.push(format!("Forecast unavailable for this series: {}", e));
            (None, None)
        }
    };

    let mut bundle = SeriesBundle::new(history);
    bundle.forecast = forecast;
    bundle.fit = fit;
    bundle.baselines = baselines;
    bundle.evaluation = evaluation;
    bundle.notices = notices;
    Ok(bundle)
}
