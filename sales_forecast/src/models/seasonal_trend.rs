//! Additive trend + seasonality model with prediction intervals
//!
//! The fitted regressors are the period index (linear trend) and the position
//! within the seasonal cycle. Seasonal offsets are only estimated once two full
//! cycles of history exist; shorter series get a pure trend fit.

use crate::aggregate::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, ModelKind, TrainedForecastModel};
use forecast_math::{seasonal_offsets, LinearTrend};
use log::debug;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Seasonal trend model configuration
#[derive(Debug, Clone, Copy)]
pub struct SeasonalTrend {
    season_length: usize,
    interval_width: f64,
}

/// Parameters estimated by [`SeasonalTrend::train`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalTrendFit {
    pub trend: LinearTrend,
    pub season_length: usize,
    /// Centred offsets per season position, when enough history exists
    pub seasonal: Option<Vec<f64>>,
    /// Residual standard deviation
    pub sigma: f64,
    pub interval_width: f64,
    /// Normal quantile used for the interval half-width
    pub z: f64,
}

/// Trained seasonal trend model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalTrend {
    fit: SeasonalTrendFit,
    history: SalesSeries,
}

impl SeasonalTrend {
    pub fn new(season_length: usize, interval_width: f64) -> Result<Self> {
        if season_length == 0 {
            return Err(ForecastError::InvalidParameter(
                "Season length must be positive".to_string(),
            ));
        }
        if !(interval_width > 0.0 && interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }
        Ok(Self {
            season_length,
            interval_width,
        })
    }

    fn z_score(&self) -> Result<f64> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::ValidationError(e.to_string()))?;
        Ok(normal.inverse_cdf(0.5 + self.interval_width / 2.0))
    }
}

impl SeasonalTrendFit {
    fn seasonal_at(&self, index: usize) -> f64 {
        self.seasonal
            .as_ref()
            .map_or(0.0, |offsets| offsets[index % self.season_length])
    }

    /// In-sample fitted value at observation `index`
    pub fn fitted_at(&self, index: usize) -> f64 {
        self.trend.predict(index as f64) + self.seasonal_at(index)
    }
}

impl ForecastModel for SeasonalTrend {
    type Trained = TrainedSeasonalTrend;

    fn train(&self, series: &SalesSeries) -> Result<Self::Trained> {
        let values = series.values();
        if values.len() < 2 {
            return Err(ForecastError::InsufficientHistory(format!(
                "seasonal trend needs at least 2 periods, have {}",
                values.len()
            )));
        }

        let trend = LinearTrend::fit(&values)?;
        let detrended: Vec<f64> = values
            .iter()
            .zip(trend.fitted())
            .map(|(y, t)| y - t)
            .collect();

        let seasonal = if values.len() >= 2 * self.season_length {
            Some(seasonal_offsets(&detrended, self.season_length)?)
        } else {
            debug!(
                "{}: {} periods is under two cycles of {}, fitting trend only",
                series.key(),
                values.len(),
                self.season_length
            );
            None
        };

        let residual_ss: f64 = detrended
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let s = seasonal
                    .as_ref()
                    .map_or(0.0, |o| o[i % self.season_length]);
                (r - s).powi(2)
            })
            .sum();

        let parameters = 2 + seasonal.as_ref().map_or(0, |_| self.season_length - 1);
        let dof = if values.len() > parameters {
            values.len() - parameters
        } else {
            values.len()
        };
        let sigma = (residual_ss / dof as f64).sqrt();

        let fit = SeasonalTrendFit {
            trend,
            season_length: self.season_length,
            seasonal,
            sigma,
            interval_width: self.interval_width,
            z: self.z_score()?,
        };

        Ok(TrainedSeasonalTrend {
            fit,
            history: series.clone(),
        })
    }

    fn kind(&self) -> ModelKind {
        ModelKind::SeasonalTrend
    }
}

impl TrainedSeasonalTrend {
    pub fn fit(&self) -> &SeasonalTrendFit {
        &self.fit
    }

    pub fn into_fit(self) -> SeasonalTrendFit {
        self.fit
    }
}

impl TrainedForecastModel for TrainedSeasonalTrend {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let n = self.history.len();
        let half_width = self.fit.z * self.fit.sigma;

        let values: Vec<f64> = (1..=horizon)
            .map(|h| self.fit.fitted_at(n - 1 + h))
            .collect();
        let intervals = values
            .iter()
            .map(|v| (v - half_width, v + half_width))
            .collect();

        ForecastResult::new_with_intervals(
            ModelKind::SeasonalTrend,
            self.history.future_periods(horizon)?,
            values,
            intervals,
        )
    }

    fn kind(&self) -> ModelKind {
        ModelKind::SeasonalTrend
    }
}
