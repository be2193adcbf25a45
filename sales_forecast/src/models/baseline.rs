//! Baseline forecasting rules
//!
//! Naive, moving-average and seasonal-naive forecasts. Each rule is a pure
//! function of the observed values; the model types wrap them so they can be
//! evaluated alongside fitted models.

use crate::aggregate::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, ModelKind, TrainedForecastModel};
use forecast_math::trailing_mean;
use log::debug;

/// Repeat the last observed value
pub fn naive(values: &[f64], horizon: usize) -> Result<Vec<f64>> {
    let last = values.last().copied().ok_or_else(|| {
        ForecastError::InsufficientHistory("naive forecast needs one observation".to_string())
    })?;
    Ok(vec![last; horizon])
}

/// Repeat the mean of the last `window` observations.
///
/// A series shorter than the window is averaged in full.
pub fn moving_average(values: &[f64], window: usize, horizon: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(ForecastError::InsufficientHistory(
            "moving average forecast needs one observation".to_string(),
        ));
    }
    let mean = trailing_mean(values, window)?;
    Ok(vec![mean; horizon])
}

/// Repeat the value observed one season earlier.
///
/// Step `h` (1-based) takes `values[n - m + (h - 1) % m]`, so horizons longer
/// than a season wrap around the last observed cycle. Falls back to
/// [`naive`] when less than one full season is available.
pub fn seasonal_naive(values: &[f64], season_length: usize, horizon: usize) -> Result<Vec<f64>> {
    if season_length == 0 {
        return Err(ForecastError::InvalidParameter(
            "Season length must be positive".to_string(),
        ));
    }
    let n = values.len();
    if n < season_length {
        debug!(
            "Seasonal naive needs {} observations, have {}; using naive",
            season_length, n
        );
        return naive(values, horizon);
    }

    let cycle = &values[n - season_length..];
    Ok((0..horizon).map(|h| cycle[h % season_length]).collect())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

#[derive(Debug, Clone, Copy)]
pub struct MovingAverage {
    window: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SeasonalNaive {
    season_length: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl SeasonalNaive {
    pub fn new(season_length: usize) -> Result<Self> {
        if season_length == 0 {
            return Err(ForecastError::InvalidParameter(
                "Season length must be positive".to_string(),
            ));
        }
        Ok(Self { season_length })
    }

    pub fn season_length(&self) -> usize {
        self.season_length
    }
}

/// A baseline rule bound to the history it forecasts from
#[derive(Debug, Clone)]
pub struct TrainedBaseline {
    kind: ModelKind,
    parameter: usize,
    history: SalesSeries,
}

impl TrainedBaseline {
    fn new(kind: ModelKind, parameter: usize, series: &SalesSeries) -> Result<Self> {
        if series.is_empty() {
            return Err(ForecastError::InsufficientHistory(format!(
                "{} needs at least one observation",
                kind
            )));
        }
        Ok(Self {
            kind,
            parameter,
            history: series.clone(),
        })
    }
}

impl TrainedForecastModel for TrainedBaseline {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let values = self.history.values();
        let forecast = match self.kind {
            ModelKind::Naive => naive(&values, horizon)?,
            ModelKind::MovingAverage => moving_average(&values, self.parameter, horizon)?,
            ModelKind::SeasonalNaive => seasonal_naive(&values, self.parameter, horizon)?,
            ModelKind::SeasonalTrend => {
                return Err(ForecastError::ValidationError(
                    "seasonal trend is not a baseline".to_string(),
                ))
            }
        };
        ForecastResult::new(self.kind, self.history.future_periods(horizon)?, forecast)
    }

    fn kind(&self) -> ModelKind {
        self.kind
    }
}

impl ForecastModel for Naive {
    type Trained = TrainedBaseline;

    fn train(&self, series: &SalesSeries) -> Result<Self::Trained> {
        TrainedBaseline::new(ModelKind::Naive, 0, series)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Naive
    }
}

impl ForecastModel for MovingAverage {
    type Trained = TrainedBaseline;

    fn train(&self, series: &SalesSeries) -> Result<Self::Trained> {
        TrainedBaseline::new(ModelKind::MovingAverage, self.window, series)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::MovingAverage
    }
}

impl ForecastModel for SeasonalNaive {
    type Trained = TrainedBaseline;

    fn train(&self, series: &SalesSeries) -> Result<Self::Trained> {
        TrainedBaseline::new(ModelKind::SeasonalNaive, self.season_length, series)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::SeasonalNaive
    }
}
