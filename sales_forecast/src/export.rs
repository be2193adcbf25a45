//! CSV exports of forecast and accuracy tables

use crate::error::{ForecastError, Result};
use crate::evaluation::Evaluation;
use crate::metrics::AccuracyRecord;
use crate::models::{ForecastResult, ModelKind};
use csv::Writer;

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ForecastError::CsvError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ForecastError::CsvError(e.to_string()))
}

/// `Period,Forecast,Lower Bound,Upper Bound`, one row per forecast period
pub fn forecast_table_csv(forecast: &ForecastResult) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Period", "Forecast", "Lower Bound", "Upper Bound"])?;
    for point in forecast.points() {
        writer.write_record([
            point.period.format("%Y-%m-%d").to_string(),
            format!("{:.2}", point.value),
            format!("{:.2}", point.lower),
            format!("{:.2}", point.upper),
        ])?;
    }
    finish(writer)
}

/// `Model,MAE,MSE,RMSE,MAPE` with MAPE as a percentage, blank when undefined
pub fn accuracy_table_csv(records: &[AccuracyRecord]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Model", "MAE", "MSE", "RMSE", "MAPE"])?;
    for record in records {
        writer.write_record([
            record.model.name().to_string(),
            format!("{:.4}", record.mae),
            format!("{:.4}", record.mse),
            format!("{:.4}", record.rmse),
            record
                .mape
                .map(|m| format!("{:.4}", m * 100.0))
                .unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

/// Actual values of the held-out window next to one candidate's forecast
pub fn evaluation_csv(evaluation: &Evaluation, model: ModelKind) -> Result<String> {
    let candidate = evaluation.candidate(model).ok_or_else(|| {
        ForecastError::InvalidParameter(format!("no evaluation for model {}", model))
    })?;

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Period", "Actual", model.name()])?;
    for ((period, actual), predicted) in evaluation
        .periods
        .iter()
        .zip(&evaluation.actual)
        .zip(candidate.forecast.values())
    {
        writer.write_record([
            period.format("%Y-%m-%d").to_string(),
            format!("{:.2}", actual),
            format!("{:.2}", predicted),
        ])?;
    }
    finish(writer)
}
