//! Transaction loading
//!
//! Rows that cannot be used are skipped and counted per reason; loading only
//! fails when a required column is absent or no row survives.

use crate::config::{ColumnNames, DataSettings};
use crate::error::{ForecastError, Result};
use crate::utils::{detect_date_format, parse_amount, parse_date};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single sales transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub category: String,
    pub region: Option<String>,
    pub store: Option<String>,
    pub segment: Option<String>,
    pub sales: f64,
}

/// Counts of rows read and skipped during a load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub malformed: usize,
    pub bad_date: usize,
    pub bad_sales: usize,
    pub missing_category: usize,
}

impl LoadReport {
    /// Total rows skipped for any reason
    pub fn skipped(&self) -> usize {
        self.malformed + self.bad_date + self.bad_sales + self.missing_category
    }
}

/// Loaded transactions plus the report describing the load
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
    report: LoadReport,
}

impl TransactionSet {
    /// Build a set from already-validated transactions
    pub fn new(transactions: Vec<Transaction>) -> Result<Self> {
        if transactions.is_empty() {
            return Err(ForecastError::NoUsableData(
                "transaction set is empty".to_string(),
            ));
        }
        let report = LoadReport {
            rows_read: transactions.len(),
            rows_loaded: transactions.len(),
            ..LoadReport::default()
        };
        Ok(Self {
            transactions,
            report,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Earliest and latest transaction dates
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let mut first = self.transactions[0].date;
        let mut last = first;
        for t in &self.transactions[1..] {
            first = first.min(t.date);
            last = last.max(t.date);
        }
        (first, last)
    }
}

/// Resolved column positions within a CSV header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    category: usize,
    sales: usize,
    region: Option<usize>,
    store: Option<usize>,
    segment: Option<usize>,
}

/// Data loader for transaction tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load transactions from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, settings: &DataSettings) -> Result<TransactionSet> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!("Loading transactions from {}", path.display());
        Self::from_reader(file, settings)
    }

    /// Load transactions from any CSV source
    pub fn from_reader<R: Read>(reader: R, settings: &DataSettings) -> Result<TransactionSet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = Self::resolve_columns(&headers, &settings.columns)?;

        let records: Vec<_> = csv_reader.records().collect();
        let raw_dates: Vec<&str> = records
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|r| r.get(columns.date).unwrap_or(""))
            .collect();
        let date_format = detect_date_format(&raw_dates, &settings.date_formats).ok_or_else(|| {
            ForecastError::ConfigError("at least one date format is required".to_string())
        })?;
        info!("Reading '{}' values as {}", &headers[columns.date], date_format);

        let mut report = LoadReport::default();
        let mut transactions = Vec::new();

        for (line, record) in records.into_iter().enumerate() {
            report.rows_read += 1;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    debug!("Skipping malformed row {}: {}", line + 2, e);
                    report.malformed += 1;
                    continue;
                }
            };

            let field = |idx: usize| record.get(idx).unwrap_or("");
            let optional = |idx: Option<usize>| {
                idx.map(|i| field(i).to_string()).filter(|s| !s.is_empty())
            };

            let Some(date) = parse_date(field(columns.date), date_format) else {
                debug!("Skipping row {}: unparseable date '{}'", line + 2, field(columns.date));
                report.bad_date += 1;
                continue;
            };
            let Some(sales) = parse_amount(field(columns.sales)) else {
                debug!("Skipping row {}: non-numeric sales '{}'", line + 2, field(columns.sales));
                report.bad_sales += 1;
                continue;
            };
            let category = field(columns.category);
            if category.is_empty() {
                debug!("Skipping row {}: missing category", line + 2);
                report.missing_category += 1;
                continue;
            }

            transactions.push(Transaction {
                date,
                category: category.to_string(),
                region: optional(columns.region),
                store: optional(columns.store),
                segment: optional(columns.segment),
                sales,
            });
        }

        report.rows_loaded = transactions.len();

        if report.skipped() > 0 {
            warn!(
                "Skipped {} of {} rows (malformed: {}, bad date: {}, bad sales: {}, missing category: {})",
                report.skipped(),
                report.rows_read,
                report.malformed,
                report.bad_date,
                report.bad_sales,
                report.missing_category
            );
        }

        if transactions.is_empty() {
            return Err(ForecastError::NoUsableData(format!(
                "all {} rows were rejected",
                report.rows_read
            )));
        }

        info!("Loaded {} transactions", report.rows_loaded);
        Ok(TransactionSet {
            transactions,
            report,
        })
    }

    fn resolve_columns(headers: &csv::StringRecord, names: &ColumnNames) -> Result<ColumnIndex> {
        let required = |configured: &str, keyword: &str| {
            Self::find_column(headers, Some(configured), keyword)
                .ok_or_else(|| ForecastError::MissingColumn(configured.to_string()))
        };

        Ok(ColumnIndex {
            date: required(&names.date, "date")?,
            category: required(&names.category, "category")?,
            sales: required(&names.sales, "sales")?,
            region: Self::find_column(headers, names.region.as_deref(), "region"),
            store: names
                .store
                .as_deref()
                .and_then(|s| Self::find_column(headers, Some(s), "store")),
            segment: Self::find_column(headers, names.segment.as_deref(), "segment"),
        })
    }

    /// Locate a column by exact configured name, then by keyword
    fn find_column(headers: &csv::StringRecord, configured: Option<&str>, keyword: &str) -> Option<usize> {
        let configured = configured?;
        if let Some(idx) = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(configured))
        {
            return Some(idx);
        }

        let found = headers
            .iter()
            .position(|h| h.to_lowercase().contains(keyword));
        if let Some(idx) = found {
            debug!(
                "Column '{}' not found, using '{}' instead",
                configured,
                &headers[idx]
            );
        }
        found
    }
}
