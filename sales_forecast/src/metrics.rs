//! Metrics for evaluating forecast accuracy

use crate::error::{ForecastError, Result};
use crate::models::ModelKind;
use crate::utils::format_percent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accuracy of one model over a held-out window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyRecord {
    pub model: ModelKind,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error as a fraction; `None` when every actual is zero
    pub mape: Option<f64>,
    /// Periods that contributed to MAPE
    pub mape_periods: usize,
}

/// Score `forecast` against `actual` over the same window
pub fn score(model: ModelKind, actual: &[f64], forecast: &[f64]) -> Result<AccuracyRecord> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::ValidationError(format!(
            "Forecast ({}) and actual ({}) values must have the same non-zero length",
            forecast.len(),
            actual.len()
        )));
    }

    let n = actual.len() as f64;
    let errors: Vec<f64> = actual
        .iter()
        .zip(forecast)
        .map(|(&a, &f)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();
    let (mape, mape_periods) = mean_absolute_percentage_error(actual, forecast);

    Ok(AccuracyRecord {
        model,
        mae,
        mse,
        rmse,
        mape,
        mape_periods,
    })
}

/// MAPE over the periods with a non-zero actual, and how many such periods there were.
///
/// Periods whose actual value is zero are excluded rather than producing an
/// infinite term.
pub fn mean_absolute_percentage_error(actual: &[f64], forecast: &[f64]) -> (Option<f64>, usize) {
    let terms: Vec<f64> = actual
        .iter()
        .zip(forecast)
        .filter(|(&a, _)| a != 0.0)
        .map(|(&a, &f)| ((a - f) / a).abs())
        .collect();

    if terms.is_empty() {
        (None, 0)
    } else {
        (
            Some(terms.iter().sum::<f64>() / terms.len() as f64),
            terms.len(),
        )
    }
}

/// Record with the lowest MAE; ties keep the earlier record
pub fn best_by_mae(records: &[AccuracyRecord]) -> Option<&AccuracyRecord> {
    records.iter().fold(None, |best: Option<&AccuracyRecord>, r| match best {
        Some(b) if b.mae <= r.mae => Some(b),
        _ => Some(r),
    })
}

impl fmt::Display for AccuracyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} accuracy:", self.model)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        match self.mape {
            Some(mape) => writeln!(f, "  MAPE:  {}", format_percent(mape)),
            None => writeln!(f, "  MAPE:  n/a"),
        }
    }
}
