use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use dashboard::router;
use pretty_assertions::assert_eq;
use sales_forecast::config::ForecastConfig;
use sales_forecast::data::TransactionSet;
use sales_forecast::state::ForecastState;
use sales_forecast::synthetic::{self, SyntheticConfig};
use sales_forecast::training::TrainingPipeline;
use tower::ServiceExt;

fn trained_state() -> ForecastState {
    let config = SyntheticConfig {
        months: 24,
        daily_transactions: 2,
        ..SyntheticConfig::default()
    };
    let set = TransactionSet::new(synthetic::generate(&config).unwrap()).unwrap();
    TrainingPipeline::new(ForecastConfig::default()).run(&set).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_index_defaults_to_overall_baseline() {
    let app = router(trained_state());
    let (status, _, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("All Sales"));
    assert!(body.contains("Baseline"));
    assert!(body.contains("<svg"));
    assert!(body.contains("/export/forecast.csv?series=overall"));
}

#[tokio::test]
async fn test_index_with_filters() {
    let app = router(trained_state());
    let (status, _, body) = get(
        &app,
        "/?series=region:West&scenario=optimistic&model=naive&from=2016-01-01&to=2017-06-30",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Region: West"));
    assert!(body.contains("Optimistic"));
}

#[tokio::test]
async fn test_unknown_series_is_not_found() {
    let app = router(trained_state());
    let (status, _, body) = get(&app, "/?series=category:Toys").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("category:Toys"));
}

#[tokio::test]
async fn test_malformed_series_is_bad_request() {
    let app = router(trained_state());
    let (status, _, _) = get(&app, "/?series=planet:Mars").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_scenario_is_not_found() {
    let app = router(trained_state());
    let (status, _, _) = get(&app, "/?scenario=Recession").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_filters_are_bad_requests() {
    let app = router(trained_state());
    for uri in [
        "/?from=2016-13-01",
        "/?from=2017-01-01&to=2016-01-01",
        "/?model=prophet",
    ] {
        let (status, _, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_forecast_csv_export() {
    let app = router(trained_state());
    let (status, headers, body) =
        get(&app, "/export/forecast.csv?series=category:Furniture&scenario=Conservative").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("forecast_category_furniture.csv"));

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "Period,Forecast,Lower Bound,Upper Bound");
    assert_eq!(lines.len(), 1 + 6);
}

#[tokio::test]
async fn test_forecast_svg_export() {
    let app = router(trained_state());
    let (status, headers, body) = get(&app, "/export/forecast.svg").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml");
    assert!(body.contains("<svg"));
    assert!(body.contains("<polygon"));
}

#[tokio::test]
async fn test_errors_csv_export() {
    let app = router(trained_state());

    let (status, _, body) = get(&app, "/export/errors.csv").await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "Model,MAE,MSE,RMSE,MAPE");
    assert_eq!(lines.len(), 1 + 4);

    let (status, _, body) = get(&app, "/export/errors.csv?model=seasonal_naive").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.lines().next(), Some("Period,Actual,Seasonal Naive"));
}

#[tokio::test]
async fn test_api_state_round_trips() {
    let state = trained_state();
    let app = router(state.clone());
    let (status, headers, body) = get(&app, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    let decoded: ForecastState = serde_json::from_str(&body).unwrap();
    assert_eq!(decoded, state);
}

#[tokio::test]
async fn test_health_reports_series_count() {
    let app = router(trained_state());
    let (status, _, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "ok");
    // Overall, three categories and four regions
    assert_eq!(value["series"], 8);
}

#[tokio::test]
async fn test_comparison_and_dataset_pages() {
    let app = router(trained_state());

    let (status, _, body) = get(&app, "/comparison?series=category:Technology").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("MAE"));
    assert!(body.contains("Best model by MAE"));
    assert!(body.contains("Seasonal Trend"));

    let (status, _, body) = get(&app, "/dataset").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Load report"));
    assert!(body.contains("Sales by category"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = router(trained_state());
    let (status, _, body) = get(&app, "/reports").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404"));
}

#[tokio::test]
async fn test_download_links_are_percent_encoded() {
    let app = router(trained_state());
    let (status, _, body) = get(&app, "/?series=category:Office%20Supplies").await;

    assert_eq!(status, StatusCode::OK);
    let link = "/export/forecast.csv?series=category%3AOffice%20Supplies&amp;scenario=Baseline";
    assert!(body.contains(link), "missing {}", link);

    // The encoded link resolves back to the same series
    let (status, headers, _) = get(
        &app,
        "/export/forecast.csv?series=category%3AOffice%20Supplies&scenario=Baseline",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("forecast_category_office_supplies.csv"));
}
