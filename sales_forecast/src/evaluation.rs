//! Held-out evaluation of every candidate model on the same window

use crate::aggregate::SalesSeries;
use crate::config::ModelSettings;
use crate::error::{ForecastError, Result};
use crate::metrics::{self, AccuracyRecord};
use crate::models::{
    ForecastModel, ForecastResult, ModelKind, MovingAverage, Naive, SeasonalNaive,
    SeasonalTrend, TrainedForecastModel,
};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Forecast and score of one candidate over the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub forecast: ForecastResult,
    pub accuracy: AccuracyRecord,
}

/// Results of scoring all candidates over one held-out window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub periods: Vec<NaiveDate>,
    pub actual: Vec<f64>,
    pub candidates: Vec<CandidateResult>,
}

impl Evaluation {
    pub fn accuracy_table(&self) -> Vec<AccuracyRecord> {
        self.candidates.iter().map(|c| c.accuracy.clone()).collect()
    }

    pub fn best_by_mae(&self) -> Option<AccuracyRecord> {
        metrics::best_by_mae(&self.accuracy_table()).cloned()
    }

    pub fn candidate(&self, model: ModelKind) -> Option<&CandidateResult> {
        self.candidates.iter().find(|c| c.forecast.model() == model)
    }

    pub fn window_len(&self) -> usize {
        self.actual.len()
    }
}

/// Train `model` on `train` and forecast `horizon` periods
pub fn fit_and_forecast<M: ForecastModel>(
    model: &M,
    train: &SalesSeries,
    horizon: usize,
) -> Result<ForecastResult> {
    model.train(train)?.forecast(horizon)
}

/// Every candidate's forecast of `horizon` periods after `series`, in [`ModelKind::ALL`] order
pub fn forecast_all(
    series: &SalesSeries,
    settings: &ModelSettings,
    horizon: usize,
) -> Result<Vec<ForecastResult>> {
    Ok(vec![
        fit_and_forecast(&Naive, series, horizon)?,
        fit_and_forecast(&MovingAverage::new(settings.moving_average_window)?, series, horizon)?,
        fit_and_forecast(&SeasonalNaive::new(settings.season_length)?, series, horizon)?,
        fit_and_forecast(
            &SeasonalTrend::new(settings.season_length, settings.interval_width)?,
            series,
            horizon,
        )?,
    ])
}

/// Hold out the last `test_periods` of `series` and score every candidate on them.
///
/// The window shrinks when needed so at least two training periods remain.
pub fn evaluate(series: &SalesSeries, settings: &ModelSettings) -> Result<Evaluation> {
    if series.len() < 3 {
        return Err(ForecastError::InsufficientHistory(format!(
            "{} has {} periods; evaluation needs at least 3",
            series.key(),
            series.len()
        )));
    }

    let window = settings.test_periods.min(series.len() - 2);
    if window < settings.test_periods {
        debug!(
            "{}: shrinking evaluation window from {} to {} periods",
            series.key(),
            settings.test_periods,
            window
        );
    }

    let (train, test) = series.split_holdout(window)?;
    let actual = test.values();

    let candidates = forecast_all(&train, settings, window)?
        .into_iter()
        .map(|forecast| {
            let accuracy = metrics::score(forecast.model(), &actual, &forecast.values())?;
            Ok(CandidateResult { forecast, accuracy })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Evaluation {
        periods: test.periods(),
        actual,
        candidates,
    })
}
