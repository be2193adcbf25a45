//! # Sales Forecast Workspace
//!
//! Retail sales forecasting in two phases. The offline phase
//! ([`sales_forecast`]) loads transactions, aggregates them per period,
//! scores baseline models against a fitted seasonal-trend model and writes a
//! state snapshot. The serving phase ([`dashboard`]) loads that snapshot once
//! and serves pages, charts and exports over HTTP.
//!
//! Shared numerical helpers live in [`forecast_math`].
//!
//! ```no_run
//! use sales_forecast_workspace::sales_forecast::{ForecastConfig, TrainingPipeline};
//!
//! let pipeline = TrainingPipeline::new(ForecastConfig::default());
//! let state = pipeline.run_from_path("data/train.csv").unwrap();
//! state.save("store/state_dump.json").unwrap();
//! ```

pub use dashboard;
pub use forecast_math;
pub use sales_forecast;
