//! Forecasting models for aggregated sales series

use crate::aggregate::SalesSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod baseline;
pub mod seasonal_trend;

/// Number of periods forecast beyond the last observation
pub const FORECAST_HORIZON: usize = 6;

/// Every candidate the evaluation harness compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Naive,
    MovingAverage,
    SeasonalNaive,
    SeasonalTrend,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Naive,
        ModelKind::MovingAverage,
        ModelKind::SeasonalNaive,
        ModelKind::SeasonalTrend,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Naive => "Naive",
            ModelKind::MovingAverage => "Moving Average",
            ModelKind::SeasonalNaive => "Seasonal Naive",
            ModelKind::SeasonalTrend => "Seasonal Trend",
        }
    }

    /// Identifier used in query strings and the snapshot
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::Naive => "naive",
            ModelKind::MovingAverage => "moving_average",
            ModelKind::SeasonalNaive => "seasonal_naive",
            ModelKind::SeasonalTrend => "seasonal_trend",
        }
    }

    pub fn is_baseline(&self) -> bool {
        !matches!(self, ModelKind::SeasonalTrend)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    /// Accepts the snake_case identifier or the display name
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "naive" => Ok(ModelKind::Naive),
            "moving_average" => Ok(ModelKind::MovingAverage),
            "seasonal_naive" => Ok(ModelKind::SeasonalNaive),
            "seasonal_trend" => Ok(ModelKind::SeasonalTrend),
            _ => Err(ForecastError::InvalidParameter(format!(
                "unknown model '{}'",
                s
            ))),
        }
    }
}

/// One forecast period with its interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: NaiveDate,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    model: ModelKind,
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Forecast without an interval; bounds equal the point estimate
    pub fn new(model: ModelKind, periods: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if values.len() != periods.len() {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match periods ({})",
                values.len(),
                periods.len()
            )));
        }

        let points = periods
            .into_iter()
            .zip(values)
            .map(|(period, value)| ForecastPoint {
                period,
                value,
                lower: value,
                upper: value,
            })
            .collect();
        Ok(Self { model, points })
    }

    /// Create a new forecast result with confidence intervals
    pub fn new_with_intervals(
        model: ModelKind,
        periods: Vec<NaiveDate>,
        values: Vec<f64>,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if values.len() != periods.len() || values.len() != intervals.len() {
            return Err(ForecastError::ValidationError(format!(
                "Values ({}), periods ({}) and intervals ({}) must have equal length",
                values.len(),
                periods.len(),
                intervals.len()
            )));
        }

        let points = periods
            .into_iter()
            .zip(values)
            .zip(intervals)
            .map(|((period, value), (lower, upper))| ForecastPoint {
                period,
                value,
                lower,
                upper,
            })
            .collect();
        Ok(Self { model, points })
    }

    /// Rebuild from points, e.g. after a scenario adjustment
    pub fn from_points(model: ModelKind, points: Vec<ForecastPoint>) -> Self {
        Self { model, points }
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn periods(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.period).collect()
    }

    /// Number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    /// Sum of point estimates over the horizon
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Points whose period falls within the inclusive range
    pub fn slice_range(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<ForecastPoint> {
        self.points
            .iter()
            .filter(|p| from.map_or(true, |f| p.period >= f) && to.map_or(true, |t| p.period <= t))
            .copied()
            .collect()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: fmt::Debug {
    /// Generate forecast for the `horizon` periods after the training data
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    fn kind(&self) -> ModelKind;
}

/// Forecast model that can be trained on a sales series
pub trait ForecastModel: fmt::Debug {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on an aggregated series
    fn train(&self, series: &SalesSeries) -> Result<Self::Trained>;

    fn kind(&self) -> ModelKind;
}

pub use baseline::{moving_average, naive, seasonal_naive, MovingAverage, Naive, SeasonalNaive};
pub use seasonal_trend::{SeasonalTrend, SeasonalTrendFit};
