//! Error types for the dashboard crate

use crate::pages;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::{debug, error};
use sales_forecast::ForecastError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Unknown series, scenario or model
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query parameters that cannot be interpreted
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type with the dashboard error
pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::Forecast(_) | DashboardError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Request rejected ({}): {}", status.as_u16(), self);
        }
        (status, Html(pages::error_page(status, &self.to_string()))).into_response()
    }
}
