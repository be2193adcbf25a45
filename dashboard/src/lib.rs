//! # Dashboard
//!
//! Serves a trained sales forecast snapshot over HTTP: a forecast page with
//! series and scenario filters, a model comparison page, a dataset page,
//! CSV/SVG exports and a JSON view of the whole state.
//!
//! The snapshot is loaded once at startup and shared read-only between
//! requests; nothing is recomputed beyond scenario scaling.
//!
//! ```no_run
//! use sales_forecast::ForecastState;
//!
//! # async fn run() -> dashboard::Result<()> {
//! let state = ForecastState::load("store/state_dump.json")?;
//! dashboard::serve(state, "127.0.0.1", 8501).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filters;
pub mod pages;
pub mod server;

pub use crate::error::{DashboardError, Result};
pub use crate::filters::{FilterParams, Selection};
pub use crate::server::{router, serve, AppState};
