//! Error types for the sales_forecast crate

use forecast_math::MathError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Every row of the input was rejected
    #[error("No usable data: {0}")]
    NoUsableData(String),

    /// Not enough periods to aggregate, fit or evaluate
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// A required input column could not be found
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to parameter or input validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error while reading or validating configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The serving phase started before a training run produced a snapshot
    #[error(
        "Forecast state not found at {}. Run `sales-train run` to generate it first.",
        .0.display()
    )]
    StateMissing(PathBuf),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from state (de)serialization
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from the numeric building blocks
    #[error("Math error: {0}")]
    MathError(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::JsonError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
