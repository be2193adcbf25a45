use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_forecast::aggregate::{Granularity, SalesSeries, SeriesKey};
use sales_forecast::config::ModelSettings;
use sales_forecast::evaluation::{evaluate, forecast_all};
use sales_forecast::export::{accuracy_table_csv, evaluation_csv, forecast_table_csv};
use sales_forecast::metrics::best_by_mae;
use sales_forecast::models::{ForecastResult, ModelKind};
use sales_forecast::ForecastError;

fn settings(test_periods: usize) -> ModelSettings {
    ModelSettings {
        moving_average_window: 3,
        season_length: 4,
        test_periods,
        interval_width: 0.8,
    }
}

fn monthly(values: &[f64]) -> SalesSeries {
    SalesSeries::from_values(
        SeriesKey::overall(),
        Granularity::Monthly,
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        values,
    )
    .unwrap()
}

#[test]
fn test_candidates_share_the_holdout_window() {
    let values = [10.0, 20.0, 30.0, 40.0, 12.0, 22.0, 32.0, 42.0, 14.0, 24.0, 34.0, 44.0];
    let evaluation = evaluate(&monthly(&values), &settings(4)).unwrap();

    assert_eq!(evaluation.window_len(), 4);
    assert_eq!(evaluation.actual, vec![14.0, 24.0, 34.0, 44.0]);
    assert_eq!(evaluation.periods[0], NaiveDate::from_ymd_opt(2021, 9, 1).unwrap());

    let models: Vec<ModelKind> = evaluation.candidates.iter().map(|c| c.forecast.model()).collect();
    assert_eq!(models, ModelKind::ALL.to_vec());
    for candidate in &evaluation.candidates {
        assert_eq!(candidate.forecast.periods(), evaluation.periods);
    }

    // Seasonal naive repeats the previous cycle: 12, 22, 32, 42
    let seasonal = evaluation.candidate(ModelKind::SeasonalNaive).unwrap();
    assert_eq!(seasonal.forecast.values(), vec![12.0, 22.0, 32.0, 42.0]);
    assert_eq!(seasonal.accuracy.mae, 2.0);

    // Naive repeats 42 over the window
    let naive = evaluation.candidate(ModelKind::Naive).unwrap();
    assert_eq!(naive.accuracy.mae, (28.0 + 18.0 + 8.0 + 2.0) / 4.0);

    assert_eq!(evaluation.accuracy_table().len(), 4);
    let best = evaluation.best_by_mae().unwrap();
    assert!(evaluation
        .candidates
        .iter()
        .all(|c| best.mae <= c.accuracy.mae));
    assert_eq!(Some(&best), best_by_mae(&evaluation.accuracy_table()));
}

#[test]
fn test_window_shrinks_for_short_series() {
    let evaluation = evaluate(&monthly(&[5.0, 6.0, 7.0, 8.0, 9.0]), &settings(6)).unwrap();
    // Two periods stay for training
    assert_eq!(evaluation.window_len(), 3);
}

#[test]
fn test_too_short_to_evaluate() {
    let result = evaluate(&monthly(&[5.0, 6.0]), &settings(6));
    assert!(matches!(result, Err(ForecastError::InsufficientHistory(_))));
}

#[test]
fn test_forecast_all_order_and_horizon() {
    let forecasts = forecast_all(&monthly(&[1.0, 2.0, 3.0, 4.0, 5.0]), &settings(2), 6).unwrap();
    let models: Vec<ModelKind> = forecasts.iter().map(ForecastResult::model).collect();
    assert_eq!(models, ModelKind::ALL.to_vec());
    assert!(forecasts.iter().all(|f| f.horizon() == 6));
}

#[test]
fn test_csv_exports() {
    let values = [10.0, 20.0, 30.0, 40.0, 12.0, 22.0, 32.0, 42.0];
    let series = monthly(&values);
    let evaluation = evaluate(&series, &settings(4)).unwrap();

    let text = evaluation_csv(&evaluation, ModelKind::SeasonalNaive).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Period,Actual,Seasonal Naive");
    assert_eq!(lines[1], "2021-05-01,12.00,10.00");
    assert_eq!(lines.len(), 5);

    let table = accuracy_table_csv(&evaluation.accuracy_table()).unwrap();
    let rows: Vec<&str> = table.lines().collect();
    assert_eq!(rows[0], "Model,MAE,MSE,RMSE,MAPE");
    assert!(rows[3].starts_with("Seasonal Naive,2.0000,4.0000,2.0000,"));

    let forecast = forecast_all(&series, &settings(4), 2).unwrap().remove(0);
    let text = forecast_table_csv(&forecast).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "Period,Forecast,Lower Bound,Upper Bound",
            "2021-09-01,42.00,42.00,42.00",
            "2021-10-01,42.00,42.00,42.00",
        ]
    );
}
