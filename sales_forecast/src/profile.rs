//! Column-level profile of the raw input table

use crate::error::Result;
use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inferred type and missing-value share of one input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub missing: usize,
    pub missing_pct: f64,
    pub distinct: Option<usize>,
}

/// Profile every column of a CSV file
pub fn profile_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ColumnSummary>> {
    let df = CsvReader::from_path(path.as_ref())?
        .has_header(true)
        .infer_schema(Some(1000))
        .finish()?;
    profile_dataframe(&df)
}

/// Profile an already-loaded DataFrame
pub fn profile_dataframe(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let rows = df.height();
    let summaries = df
        .get_columns()
        .iter()
        .map(|s| {
            let missing = s.null_count();
            let missing_pct = if rows == 0 {
                0.0
            } else {
                (missing as f64 / rows as f64 * 10_000.0).round() / 100.0
            };
            let distinct = if matches!(s.dtype(), DataType::Utf8) {
                s.n_unique().ok()
            } else {
                None
            };
            ColumnSummary {
                name: s.name().to_string(),
                dtype: s.dtype().to_string(),
                missing,
                missing_pct,
                distinct,
            }
        })
        .collect::<Vec<_>>();

    debug!("Profiled {} columns over {} rows", summaries.len(), rows);
    Ok(summaries)
}
