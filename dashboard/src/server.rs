//! Router and request handlers

use crate::error::{DashboardError, Result};
use crate::filters::FilterParams;
use crate::pages;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use sales_forecast::chart::{line_chart_svg, ChartSpec};
use sales_forecast::export;
use sales_forecast::state::ForecastState;
use serde_json::json;
use std::sync::Arc;

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub state: Arc<ForecastState>,
}

/// Build the dashboard router over a loaded snapshot
pub fn router(state: ForecastState) -> Router {
    let app_state = AppState {
        state: Arc::new(state),
    };

    Router::new()
        .route("/", get(forecast_handler))
        .route("/comparison", get(comparison_handler))
        .route("/dataset", get(dataset_handler))
        .route("/export/forecast.csv", get(forecast_csv_handler))
        .route("/export/forecast.svg", get(forecast_svg_handler))
        .route("/export/errors.csv", get(errors_csv_handler))
        .route("/api/state", get(state_json_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .with_state(app_state)
}

fn attachment(content_type: &'static str, filename: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

fn file_stem(key: &sales_forecast::SeriesKey) -> String {
    key.to_string().replace([':', ' ', '/'], "_").to_lowercase()
}

async fn forecast_handler(
    State(app): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Html<String>> {
    let selection = params.resolve(&app.state)?;
    let projected = selection.projected()?;
    Ok(Html(pages::forecast_page(&app.state, &selection, &projected)))
}

async fn comparison_handler(
    State(app): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Html<String>> {
    let selection = params.resolve(&app.state)?;
    Ok(Html(pages::comparison_page(&app.state, selection.bundle)))
}

async fn dataset_handler(State(app): State<AppState>) -> Html<String> {
    Html(pages::dataset_page(&app.state))
}

async fn forecast_csv_handler(
    State(app): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Response> {
    let selection = params.resolve(&app.state)?;
    let projected = selection.projected()?;
    let csv = export::forecast_table_csv(&projected)?;
    Ok(attachment(
        "text/csv; charset=utf-8",
        format!("forecast_{}.csv", file_stem(&selection.bundle.key)),
        csv,
    ))
}

async fn forecast_svg_handler(
    State(app): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Response> {
    let selection = params.resolve(&app.state)?;
    let projected = selection.projected()?;
    let spec = ChartSpec::new(format!(
        "{}: {} ({})",
        selection.bundle.key.display_name(),
        projected.model(),
        selection.scenario.label()
    ))
    .with_history(selection.bundle.history.slice_range(selection.from, selection.to))
    .with_forecast(projected.slice_range(selection.from, selection.to));
    Ok(attachment(
        "image/svg+xml",
        format!("forecast_{}.svg", file_stem(&selection.bundle.key)),
        line_chart_svg(&spec),
    ))
}

/// Accuracy table, or the holdout comparison of one model when `model` is given
async fn errors_csv_handler(
    State(app): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Response> {
    let selection = params.resolve(&app.state)?;
    let evaluation = selection.bundle.evaluation.as_ref().ok_or_else(|| {
        DashboardError::NotFound(format!(
            "no evaluation for {}",
            selection.bundle.key.display_name()
        ))
    })?;
    let csv = match selection.model {
        Some(model) => export::evaluation_csv(evaluation, model)?,
        None => export::accuracy_table_csv(&evaluation.accuracy_table())?,
    };
    Ok(attachment(
        "text/csv; charset=utf-8",
        format!("errors_{}.csv", file_stem(&selection.bundle.key)),
        csv,
    ))
}

async fn state_json_handler(State(app): State<AppState>) -> Result<Response> {
    let body = serde_json::to_string(app.state.as_ref())
        .map_err(sales_forecast::ForecastError::from)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn health_handler(State(app): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "series": app.state.series.len(),
        "created_at": app.state.created_at.to_rfc3339(),
    }))
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(pages::error_page(StatusCode::NOT_FOUND, "No such page")),
    )
}

/// Bind and serve until the process is stopped
pub async fn serve(state: ForecastState, host: &str, port: u16) -> Result<()> {
    let series = state.series.len();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!("Serving {} series on {}", series, addr);
    println!("Dashboard available at http://{}:{}", host, addr.port());
    axum::serve(listener, app).await?;
    Ok(())
}
