//! Moving average calculations
//!
//! Contains:
//! - Simple Moving Average (SMA) over a sliding window
//! - Trailing mean of the last `k` observations
//! - Rolling mean and rolling standard deviation series

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new value into the window
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Current average, once the window is full
    pub fn value(&self) -> Option<f64> {
        if self.values.len() < self.period {
            return None;
        }
        Some(self.sum / self.period as f64)
    }

    /// Values currently inside the window, oldest first
    pub fn window(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.period
    }
}

/// Mean of the last `window` values.
///
/// When fewer than `window` values exist the mean of all of them is returned.
pub fn trailing_mean(values: &[f64], window: usize) -> Result<f64> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window must be greater than zero".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty series".to_string(),
        ));
    }

    let start = values.len().saturating_sub(window);
    let tail = &values[start..];
    Ok(tail.iter().sum::<f64>() / tail.len() as f64)
}

/// Rolling mean aligned to `values`; `None` until the window is full.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    Ok(values
        .iter()
        .map(|&v| {
            sma.update(v);
            sma.value()
        })
        .collect())
}

/// Rolling sample standard deviation aligned to `values`.
///
/// `None` until the window is full, and always `None` for a window of one
/// since the sample deviation is undefined there.
pub fn rolling_std(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    Ok(values
        .iter()
        .map(|&v| {
            sma.update(v);
            if !sma.is_full() || window < 2 {
                return None;
            }
            let mean = sma.window().sum::<f64>() / window as f64;
            let variance = sma.window().map(|x| (x - mean).powi(2)).sum::<f64>()
                / (window - 1) as f64;
            Some(variance.sqrt())
        })
        .collect())
}
