//! # Sales Forecast
//!
//! Offline training phase for retail sales forecasting.
//!
//! ## Features
//!
//! - Transaction loading that skips and counts unusable rows
//! - Aggregation into contiguous daily, weekly or monthly series (overall and per attribute)
//! - Baseline forecasters (Naive, Moving Average, Seasonal Naive) and a fitted
//!   seasonal trend model with prediction intervals
//! - Accuracy scoring (MAE, MSE, RMSE, MAPE) over a common held-out window
//! - What-if growth scenarios
//! - A JSON state snapshot consumed by the dashboard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::config::ForecastConfig;
//! use sales_forecast::training::TrainingPipeline;
//!
//! let config = ForecastConfig::default();
//! let state = TrainingPipeline::new(config.clone()).run_from_path(&config.data.path)?;
//! state.save(&config.state.path)?;
//!
//! if let Some(overall) = state.overall() {
//!     if let Some(forecast) = overall.primary_forecast() {
//!         println!("Next {} periods: {:?}", forecast.horizon(), forecast.values());
//!     }
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod metrics;
pub mod models;
pub mod overview;
pub mod profile;
pub mod scenario;
pub mod state;
pub mod synthetic;
pub mod training;
pub mod utils;

// Re-export commonly used types
pub use crate::aggregate::{aggregate, Dimension, Granularity, SalesSeries, SeriesKey};
pub use crate::config::{ForecastConfig, ModelSettings};
pub use crate::data::{DataLoader, Transaction, TransactionSet};
pub use crate::error::{ForecastError, Result};
pub use crate::evaluation::{evaluate, Evaluation};
pub use crate::metrics::AccuracyRecord;
pub use crate::models::{ForecastModel, ForecastResult, ModelKind, FORECAST_HORIZON};
pub use crate::scenario::Scenario;
pub use crate::state::{ForecastState, SeriesBundle};
pub use crate::training::TrainingPipeline;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
