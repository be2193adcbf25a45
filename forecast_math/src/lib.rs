//! # Forecast Math
//!
//! Numeric building blocks used by the sales forecasting crates.
//! Everything here works on plain `f64` slices and performs no I/O.

use thiserror::Error;

pub mod descriptive;
pub mod moving_averages;
pub mod regression;
pub mod seasonal;

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;

pub use descriptive::{iqr_fences, mean, quantile, sample_std_dev};
pub use moving_averages::{rolling_mean, rolling_std, trailing_mean, SimpleMovingAverage};
pub use regression::LinearTrend;
pub use seasonal::seasonal_offsets;
