use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_forecast::config::ForecastConfig;
use sales_forecast::data::{Transaction, TransactionSet};
use sales_forecast::models::{ModelKind, FORECAST_HORIZON};
use sales_forecast::scenario::Scenario;
use sales_forecast::state::ForecastState;
use sales_forecast::synthetic::{self, SyntheticConfig};
use sales_forecast::training::TrainingPipeline;
use tempfile::tempdir;

// One transaction of 100 in each of 24 consecutive months
fn constant_transactions() -> TransactionSet {
    let transactions = (0..24)
        .map(|i| Transaction {
            date: NaiveDate::from_ymd_opt(2020 + i / 12, (i % 12) as u32 + 1, 15).unwrap(),
            category: "Furniture".to_string(),
            region: None,
            store: None,
            segment: None,
            sales: 100.0,
        })
        .collect();
    TransactionSet::new(transactions).unwrap()
}

#[test]
fn test_constant_series_end_to_end() {
    let state = TrainingPipeline::new(ForecastConfig::default())
        .run(&constant_transactions())
        .unwrap();

    // Overall plus the single category; no region values exist
    assert_eq!(state.series.len(), 2);

    for bundle in &state.series {
        assert_eq!(bundle.history.values(), vec![100.0; 24]);
        assert!(bundle.notices.is_empty(), "{:?}", bundle.notices);

        for model in ModelKind::ALL {
            let forecast = bundle.forecast_for(model).unwrap();
            assert_eq!(forecast.horizon(), FORECAST_HORIZON);
            assert_eq!(forecast.values(), vec![100.0; FORECAST_HORIZON], "{}", model);
        }
        assert_eq!(
            bundle.forecast.as_ref().unwrap().periods()[0],
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
        );

        let evaluation = bundle.evaluation.as_ref().unwrap();
        assert_eq!(evaluation.window_len(), 6);
        assert_eq!(evaluation.actual, vec![100.0; 6]);
        for record in evaluation.accuracy_table() {
            assert_eq!(record.mae, 0.0, "{}", record.model);
            assert_eq!(record.rmse, 0.0, "{}", record.model);
            assert_eq!(record.mape, Some(0.0), "{}", record.model);
        }
    }
}

#[test]
fn test_scenarios_on_trained_forecast() {
    let state = TrainingPipeline::new(ForecastConfig::default())
        .run(&constant_transactions())
        .unwrap();
    let forecast = state.overall().unwrap().primary_forecast().unwrap();

    let baseline = state.scenario("Baseline").unwrap();
    assert_eq!(&baseline.project(forecast), forecast);

    let conservative = Scenario::find(&state.scenarios, "Conservative").unwrap();
    assert_eq!(conservative.project(forecast).values(), vec![90.0; FORECAST_HORIZON]);
}

#[test]
fn test_short_history_produces_notices() {
    let transactions = vec![
        Transaction {
            date: NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
            category: "A".to_string(),
            region: None,
            store: None,
            segment: None,
            sales: 10.0,
        },
        Transaction {
            date: NaiveDate::from_ymd_opt(2020, 2, 10).unwrap(),
            category: "A".to_string(),
            region: None,
            store: None,
            segment: None,
            sales: 20.0,
        },
    ];
    let state = TrainingPipeline::new(ForecastConfig::default())
        .run(&TransactionSet::new(transactions).unwrap())
        .unwrap();

    let overall = state.overall().unwrap();
    assert!(overall.evaluation.is_none());
    assert!(overall
        .notices
        .iter()
        .any(|n| n.starts_with("Model comparison unavailable")));
    // Seasonal naive falls back to the last value
    assert_eq!(
        overall.forecast_for(ModelKind::SeasonalNaive).unwrap().values(),
        vec![20.0; FORECAST_HORIZON]
    );
    assert!(overall.forecast.is_some());
}

#[test]
fn test_full_training_workflow_from_csv() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("train.csv");
    let state_path = dir.path().join("store").join("state_dump.json");

    let config = SyntheticConfig {
        months: 36,
        daily_transactions: 2,
        ..SyntheticConfig::default()
    };
    synthetic::write_csv(&data_path, &synthetic::generate(&config).unwrap()).unwrap();

    let state = TrainingPipeline::new(ForecastConfig::default())
        .run_from_path(&data_path)
        .unwrap();
    assert_eq!(state.load_report.skipped(), 0);
    assert_eq!(state.columns.len(), 5);
    assert!(state.overview.is_some());

    state.save(&state_path).unwrap();
    let loaded = ForecastState::load(&state_path).unwrap();
    assert_eq!(loaded, state);

    let overall = loaded.overall().unwrap();
    assert_eq!(overall.history.len(), 36);
    assert!(overall.fit.as_ref().unwrap().seasonal.is_some());
    for p in overall.forecast.as_ref().unwrap().points() {
        assert!(p.lower <= p.value && p.value <= p.upper);
    }
}
