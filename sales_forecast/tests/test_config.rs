use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::aggregate::{Dimension, Granularity};
use sales_forecast::config::ForecastConfig;
use sales_forecast::ForecastError;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_empty_file_yields_defaults() {
    let config = ForecastConfig::from_toml_str("").unwrap();

    assert_eq!(config.data.path, PathBuf::from("data/train.csv"));
    assert_eq!(config.data.columns.date, "Order Date");
    assert_eq!(config.aggregation.granularity, Granularity::Monthly);
    assert_eq!(
        config.aggregation.dimensions,
        vec![Dimension::Category, Dimension::Region]
    );
    assert_eq!(config.state.path, PathBuf::from("store/state_dump.json"));
    assert_eq!(config.dashboard.port, 8501);
    assert_eq!(config.scenarios.len(), 4);

    let settings = config.model_settings();
    assert_eq!(settings.moving_average_window, 3);
    assert_eq!(settings.season_length, 12);
    assert_eq!(settings.test_periods, 6);
    assert_eq!(settings.interval_width, 0.8);
}

#[test]
fn test_overrides_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[data]
path = "input/sales.csv"

[data.columns]
date = "Date"
store = "Store"

[aggregation]
granularity = "weekly"
dimensions = ["store"]

[model]
test_periods = 4

[[scenarios]]
name = "Slump"
growth = -0.25

[dashboard]
port = 9000
"#
    )
    .unwrap();

    let config = ForecastConfig::load(file.path()).unwrap();

    assert_eq!(config.data.path, PathBuf::from("input/sales.csv"));
    assert_eq!(config.data.columns.date, "Date");
    assert_eq!(config.data.columns.store.as_deref(), Some("Store"));
    // Unset keys in a present section keep their defaults
    assert_eq!(config.data.columns.sales, "Sales");
    assert_eq!(config.aggregation.dimensions, vec![Dimension::Store]);
    assert_eq!(config.dashboard.host, "127.0.0.1");
    assert_eq!(config.dashboard.port, 9000);

    let settings = config.model_settings();
    assert_eq!(settings.moving_average_window, 4);
    assert_eq!(settings.season_length, 52);
    assert_eq!(settings.test_periods, 4);

    assert_eq!(config.scenarios.len(), 1);
    assert_eq!(config.scenarios()[0].name, "Slump");
}

#[rstest]
#[case("[model]\ninterval_width = 1.5")]
#[case("[model]\ntest_periods = 0")]
#[case("[model]\nmoving_average_window = 0")]
#[case("[model]\nseason_length = 0")]
#[case("[aggregation]\ndimensions = [\"overall\"]")]
#[case("[aggregation]\ngranularity = \"hourly\"")]
#[case("[data]\ndate_formats = []")]
#[case("[[scenarios]]\nname = \"A\"\ngrowth = 0.1\n[[scenarios]]\nname = \"a\"\ngrowth = 0.2")]
#[case("[[scenarios]]\nname = \"Wipeout\"\ngrowth = -1.0")]
fn test_invalid_config(#[case] text: &str) {
    let result = ForecastConfig::from_toml_str(text);
    assert!(
        matches!(result, Err(ForecastError::ConfigError(_))),
        "expected ConfigError for {:?}, got {:?}",
        text,
        result
    );
}

#[test]
fn test_missing_config_file() {
    let result = ForecastConfig::load("no/such/config.toml");
    assert!(matches!(result, Err(ForecastError::ConfigError(_))));
}

#[test]
fn test_load_or_default_without_path() {
    let config = ForecastConfig::load_or_default(None).unwrap();
    assert_eq!(config, ForecastConfig::default());
}
