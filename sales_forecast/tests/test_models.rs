use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::aggregate::{Granularity, SalesSeries, SeriesKey};
use sales_forecast::models::{
    moving_average, naive, seasonal_naive, ForecastModel, ModelKind, MovingAverage, Naive,
    SeasonalNaive, SeasonalTrend, TrainedForecastModel, FORECAST_HORIZON,
};
use sales_forecast::ForecastError;

fn monthly(values: &[f64]) -> SalesSeries {
    SalesSeries::from_values(
        SeriesKey::overall(),
        Granularity::Monthly,
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        values,
    )
    .unwrap()
}

fn seasonal_values(cycles: usize) -> Vec<f64> {
    let pattern = [10.0, 12.0, 15.0, 20.0, 18.0, 14.0, 11.0, 9.0, 13.0, 16.0, 22.0, 30.0];
    (0..cycles * 12)
        .map(|i| pattern[i % 12] + i as f64 * 0.5)
        .collect()
}

#[rstest]
#[case(vec![5.0, 7.0])]
#[case(vec![1.0, 2.0, 3.0, 4.0])]
#[case(seasonal_values(2))]
fn test_naive_repeats_last_value(#[case] values: Vec<f64>) {
    let forecast = naive(&values, FORECAST_HORIZON).unwrap();
    let last = *values.last().unwrap();
    assert_eq!(forecast, vec![last; FORECAST_HORIZON]);
}

#[rstest]
#[case(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 5.0)]
#[case(vec![10.0, 20.0, 30.0, 40.0], 4, 25.0)]
#[case(vec![2.0, 4.0], 3, 3.0)]
fn test_moving_average_is_mean_of_last_window(
    #[case] values: Vec<f64>,
    #[case] window: usize,
    #[case] expected: f64,
) {
    let forecast = moving_average(&values, window, FORECAST_HORIZON).unwrap();
    assert_eq!(forecast.len(), FORECAST_HORIZON);
    for value in forecast {
        assert_approx_eq!(value, expected, 1e-12);
    }
}

#[test]
fn test_moving_average_rejects_zero_window() {
    assert!(matches!(
        moving_average(&[1.0, 2.0], 0, 3),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(MovingAverage::new(0).is_err());
}

#[test]
fn test_seasonal_naive_uses_previous_cycle() {
    let values = seasonal_values(2);
    let n = values.len();
    let m = 12;

    let forecast = seasonal_naive(&values, m, FORECAST_HORIZON).unwrap();
    for (i, value) in forecast.iter().enumerate() {
        // Forecast period n + i sits one cycle after observation n + i - m
        assert_eq!(*value, values[n + i - m]);
    }
}

#[test]
fn test_seasonal_naive_wraps_long_horizon() {
    let values = vec![1.0, 2.0, 3.0, 4.0];
    let forecast = seasonal_naive(&values, 2, 5).unwrap();
    assert_eq!(forecast, vec![3.0, 4.0, 3.0, 4.0, 3.0]);
}

#[test]
fn test_seasonal_naive_short_history_degrades_to_naive() {
    let values = vec![4.0, 8.0, 6.0];
    let forecast = seasonal_naive(&values, 12, FORECAST_HORIZON).unwrap();
    assert_eq!(forecast, naive(&values, FORECAST_HORIZON).unwrap());
}

#[test]
fn test_baselines_are_deterministic() {
    let series = monthly(&seasonal_values(2));
    let first = SeasonalNaive::new(12).unwrap().train(&series).unwrap().forecast(6).unwrap();
    let second = SeasonalNaive::new(12).unwrap().train(&series).unwrap().forecast(6).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_baseline_forecast_periods_follow_history() {
    let series = monthly(&[1.0, 2.0, 3.0]);
    let forecast = Naive.train(&series).unwrap().forecast(2).unwrap();

    assert_eq!(forecast.model(), ModelKind::Naive);
    assert_eq!(
        forecast.periods(),
        vec![
            NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
        ]
    );
    // Baselines carry no interval
    for p in forecast.points() {
        assert_eq!(p.lower, p.value);
        assert_eq!(p.upper, p.value);
    }
}

#[test]
fn test_seasonal_trend_extends_linear_series() {
    let values: Vec<f64> = (0..10).map(|i| 10.0 + 2.0 * i as f64).collect();
    let trained = SeasonalTrend::new(12, 0.8).unwrap().train(&monthly(&values)).unwrap();

    assert!(trained.fit().seasonal.is_none());
    assert_approx_eq!(trained.fit().trend.slope(), 2.0, 1e-9);

    let forecast = trained.forecast(3).unwrap();
    let expected = [30.0, 32.0, 34.0];
    for (value, expected) in forecast.values().iter().zip(expected) {
        assert_approx_eq!(*value, expected, 1e-9);
    }
}

#[test]
fn test_seasonal_trend_recovers_seasonal_pattern() {
    let values = seasonal_values(3);
    let trained = SeasonalTrend::new(12, 0.8).unwrap().train(&monthly(&values)).unwrap();

    let offsets = trained.fit().seasonal.as_ref().unwrap();
    assert_eq!(offsets.len(), 12);
    assert_approx_eq!(offsets.iter().sum::<f64>(), 0.0, 1e-9);

    // The last pattern point (30) sits well above the cycle average
    assert!(offsets[11] > offsets[0]);

    let forecast = trained.forecast(12).unwrap();
    let values_f = forecast.values();
    assert!(values_f[11] > values_f[0]);
}

#[test]
fn test_seasonal_trend_interval_brackets_estimate() {
    let values: Vec<f64> = (0..24)
        .map(|i| 100.0 + i as f64 + ((i * 7) % 5) as f64)
        .collect();
    let forecast = SeasonalTrend::new(12, 0.8)
        .unwrap()
        .train(&monthly(&values))
        .unwrap()
        .forecast(FORECAST_HORIZON)
        .unwrap();

    for p in forecast.points() {
        assert!(p.lower < p.value && p.value < p.upper);
    }
}

#[test]
fn test_wider_interval_for_higher_width() {
    let values: Vec<f64> = (0..12).map(|i| 50.0 + (i % 3) as f64 * 4.0).collect();
    let series = monthly(&values);
    let narrow = SeasonalTrend::new(12, 0.5).unwrap().train(&series).unwrap();
    let wide = SeasonalTrend::new(12, 0.95).unwrap().train(&series).unwrap();

    assert!(wide.fit().z > narrow.fit().z);
    assert_approx_eq!(wide.fit().z, 1.959964, 1e-5);
}

#[rstest]
#[case(0, 0.8)]
#[case(12, 0.0)]
#[case(12, 1.0)]
fn test_seasonal_trend_rejects_bad_parameters(#[case] season: usize, #[case] width: f64) {
    assert!(SeasonalTrend::new(season, width).is_err());
}

#[test]
fn test_seasonal_trend_needs_two_points() {
    let result = SeasonalTrend::new(12, 0.8).unwrap().train(&monthly(&[1.0]));
    assert!(matches!(result, Err(ForecastError::InsufficientHistory(_))));
}

#[test]
fn test_constant_series_all_models_agree() {
    let series = monthly(&[100.0; 24]);

    let results = vec![
        Naive.train(&series).unwrap().forecast(FORECAST_HORIZON).unwrap(),
        MovingAverage::new(3).unwrap().train(&series).unwrap().forecast(FORECAST_HORIZON).unwrap(),
        SeasonalNaive::new(12).unwrap().train(&series).unwrap().forecast(FORECAST_HORIZON).unwrap(),
        SeasonalTrend::new(12, 0.8).unwrap().train(&series).unwrap().forecast(FORECAST_HORIZON).unwrap(),
    ];

    for forecast in results {
        assert_eq!(forecast.values(), vec![100.0; FORECAST_HORIZON], "{}", forecast.model());
        assert_eq!(forecast.total(), 600.0);
    }
}

#[rstest]
#[case("naive", ModelKind::Naive)]
#[case("Moving Average", ModelKind::MovingAverage)]
#[case("seasonal-naive", ModelKind::SeasonalNaive)]
#[case("seasonal_trend", ModelKind::SeasonalTrend)]
fn test_model_kind_parsing(#[case] text: &str, #[case] expected: ModelKind) {
    let parsed: ModelKind = text.parse().unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(expected.id().parse::<ModelKind>().unwrap(), expected);
}
