use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::models::{ForecastResult, ModelKind};
use sales_forecast::Scenario;

fn create_forecast() -> ForecastResult {
    let periods = (1..=6)
        .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
        .collect();
    let values = vec![100.0, 110.0, 95.5, 120.25, 80.0, 101.0];
    let intervals = values.iter().map(|v| (v - 10.0, v + 10.0)).collect();
    ForecastResult::new_with_intervals(ModelKind::SeasonalTrend, periods, values, intervals)
        .unwrap()
}

#[test]
fn test_baseline_scenario_leaves_forecast_unchanged() {
    let forecast = create_forecast();
    let baseline = Scenario::new("Baseline", 0.0).unwrap();
    assert_eq!(baseline.project(&forecast), forecast);
}

#[test]
fn test_conservative_scenario_is_ninety_percent() {
    let forecast = create_forecast();
    let conservative = Scenario::find(&Scenario::defaults(), "conservative")
        .unwrap()
        .clone();
    assert_eq!(conservative.multiplier(), 0.9);

    let projected = conservative.project(&forecast);
    assert_eq!(projected.model(), forecast.model());
    assert_eq!(projected.periods(), forecast.periods());
    for (p, original) in projected.points().iter().zip(forecast.points()) {
        assert_eq!(p.value, original.value * 0.9);
        assert_eq!(p.lower, original.lower * 0.9);
        assert_eq!(p.upper, original.upper * 0.9);
    }
}

#[test]
fn test_default_scenarios() {
    let names: Vec<(String, f64)> = Scenario::defaults()
        .into_iter()
        .map(|s| (s.name, s.growth))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Conservative".to_string(), -0.10),
            ("Baseline".to_string(), 0.0),
            ("Optimistic".to_string(), 0.10),
            ("Aggressive".to_string(), 0.20),
        ]
    );
}

#[rstest]
#[case(-0.10, "Conservative scenario selected. Focus on cost control and promotions.")]
#[case(0.0, "Baseline scenario selected. Maintain current strategy.")]
#[case(0.10, "Moderate growth expected. Gradual scaling recommended.")]
#[case(0.15, "Aggressive growth scenario selected. Plan for higher inventory and operational capacity.")]
#[case(0.20, "Aggressive growth scenario selected. Plan for higher inventory and operational capacity.")]
fn test_insight_by_growth(#[case] growth: f64, #[case] expected: &str) {
    let scenario = Scenario::new("Test", growth).unwrap();
    assert_eq!(scenario.insight(), expected);
}

#[rstest]
#[case("Optimistic", 0.10, "Optimistic (+10%)")]
#[case("Conservative", -0.10, "Conservative (-10%)")]
#[case("Baseline", 0.0, "Baseline (0%)")]
fn test_label(#[case] name: &str, #[case] growth: f64, #[case] expected: &str) {
    assert_eq!(Scenario::new(name, growth).unwrap().label(), expected);
}

#[rstest]
#[case("", 0.1)]
#[case("Collapse", -1.0)]
#[case("Broken", f64::NAN)]
fn test_invalid_scenarios(#[case] name: &str, #[case] growth: f64) {
    assert!(Scenario::new(name, growth).is_err());
}

#[test]
fn test_find_is_case_insensitive() {
    let scenarios = Scenario::defaults();
    assert_eq!(
        Scenario::find(&scenarios, "OPTIMISTIC").map(|s| s.growth),
        Some(0.10)
    );
    assert!(Scenario::find(&scenarios, "Pessimistic").is_none());
}
