use assert_approx_eq::assert_approx_eq;
use sales_forecast::metrics::{best_by_mae, mean_absolute_percentage_error, score};
use sales_forecast::{ForecastError, ModelKind};

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let record = score(ModelKind::Naive, &actual, &predicted).unwrap();

    assert_approx_eq!(record.mae, 2.4, 1e-12);
    assert_approx_eq!(record.mse, 6.0, 1e-12);
    assert_approx_eq!(record.rmse, 6.0_f64.sqrt(), 1e-12);
    assert_approx_eq!(record.mape.unwrap(), 0.103, 1e-12);
    assert_eq!(record.mape_periods, 5);
}

#[test]
fn test_mape_skips_zero_actuals() {
    let actual = vec![0.0, 100.0, 0.0];
    let predicted = vec![10.0, 110.0, 5.0];

    let (mape, periods) = mean_absolute_percentage_error(&actual, &predicted);
    assert_approx_eq!(mape.unwrap(), 0.1, 1e-12);
    assert_eq!(periods, 1);

    // MAE and RMSE still cover every period
    let record = score(ModelKind::MovingAverage, &actual, &predicted).unwrap();
    assert_approx_eq!(record.mae, 25.0 / 3.0, 1e-12);
    assert!(record.mape.unwrap().is_finite());
}

#[test]
fn test_mape_undefined_when_all_actuals_zero() {
    let record = score(ModelKind::Naive, &[0.0, 0.0], &[1.0, 2.0]).unwrap();
    assert_eq!(record.mape, None);
    assert_eq!(record.mape_periods, 0);
}

#[test]
fn test_perfect_forecast_scores_zero() {
    let values = vec![100.0; 6];
    let record = score(ModelKind::SeasonalTrend, &values, &values).unwrap();
    assert_eq!(record.mae, 0.0);
    assert_eq!(record.rmse, 0.0);
    assert_eq!(record.mape, Some(0.0));
}

#[test]
fn test_score_rejects_mismatched_windows() {
    assert!(matches!(
        score(ModelKind::Naive, &[1.0, 2.0], &[1.0]),
        Err(ForecastError::ValidationError(_))
    ));
    assert!(score(ModelKind::Naive, &[], &[]).is_err());
}

#[test]
fn test_best_by_mae_keeps_first_on_tie() {
    let a = score(ModelKind::Naive, &[10.0], &[12.0]).unwrap();
    let b = score(ModelKind::MovingAverage, &[10.0], &[8.0]).unwrap();
    let c = score(ModelKind::SeasonalNaive, &[10.0], &[10.5]).unwrap();

    assert_eq!(best_by_mae(&[a.clone(), b.clone()]).unwrap().model, ModelKind::Naive);
    assert_eq!(best_by_mae(&[a, b, c]).unwrap().model, ModelKind::SeasonalNaive);
    assert!(best_by_mae(&[]).is_none());
}

#[test]
fn test_record_display() {
    let record = score(ModelKind::Naive, &[100.0, 200.0], &[110.0, 180.0]).unwrap();
    let text = record.to_string();
    assert!(text.contains("Naive accuracy:"));
    assert!(text.contains("MAE:   15.0000"));
    assert!(text.contains("MAPE:  10.00%"));
}
