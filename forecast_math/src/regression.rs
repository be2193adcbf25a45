//! Least-squares linear trend over an evenly spaced series.
//!
//! The regressor is the observation index `0..n`, so `predict(n + h - 1)`
//! extrapolates `h` steps past the last observation.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Fitted straight line `intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    observations: usize,
}

impl LinearTrend {
    /// Fit a trend line to `values` indexed by position
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Need at least 2 points to fit a trend".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Trend input contains non-finite values".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (values.len() - 1) as f64 / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            numerator += dx * (y - y_mean);
            denominator += dx * dx;
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        Ok(Self {
            slope,
            intercept,
            observations: values.len(),
        })
    }

    /// Value of the line at index `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Value `steps_ahead` periods after the last fitted observation
    pub fn extrapolate(&self, steps_ahead: usize) -> f64 {
        self.predict((self.observations + steps_ahead - 1) as f64)
    }

    /// Fitted values for the training indices
    pub fn fitted(&self) -> Vec<f64> {
        (0..self.observations).map(|i| self.predict(i as f64)).collect()
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn observations(&self) -> usize {
        self.observations
    }
}
