//! Dataset overview shown on the dashboard's dataset page
//!
//! Totals by attribute, data-quality findings (invalid sales, duplicates,
//! outliers, missing dates) and daily/monthly descriptive series.

use crate::aggregate::{aggregate, Granularity};
use crate::data::{Transaction, TransactionSet};
use crate::error::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use forecast_math::{iqr_fences, rolling_mean, rolling_std};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Window for the daily rolling mean and volatility
pub const ROLLING_WINDOW: usize = 30;

/// Sales total for one attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub name: String,
    pub sales: f64,
    pub transactions: usize,
}

/// One day of the daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub sales: f64,
    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub total_sales: f64,
    pub by_category: Vec<GroupTotal>,
    pub by_region: Vec<GroupTotal>,
    pub by_segment: Vec<GroupTotal>,
    /// Transactions with zero or negative sales
    pub invalid_sales: Vec<Transaction>,
    /// Repeats of an earlier identical transaction
    pub duplicates: Vec<Transaction>,
    /// Transactions outside the 1.5 IQR fences
    pub outliers: Vec<Transaction>,
    /// Calendar days in range without any transaction
    pub missing_dates: Vec<NaiveDate>,
    pub daily: Vec<DailyPoint>,
    /// Average daily sales, Monday first
    pub weekday_average: Vec<(String, f64)>,
    /// Average monthly total per calendar month, January first
    pub monthly_average: Vec<(String, f64)>,
}

impl DatasetOverview {
    pub fn from_transactions(set: &TransactionSet) -> Result<Self> {
        let transactions = set.transactions();
        let (first_date, last_date) = set.date_range();

        let daily = daily_series(transactions, first_date, last_date)?;
        let missing_dates = daily_missing_dates(transactions, first_date, last_date);

        Ok(Self {
            rows: transactions.len(),
            first_date,
            last_date,
            total_sales: transactions.iter().map(|t| t.sales).sum(),
            by_category: group_totals(transactions, |t| Some(t.category.as_str())),
            by_region: group_totals(transactions, |t| t.region.as_deref()),
            by_segment: group_totals(transactions, |t| t.segment.as_deref()),
            invalid_sales: transactions
                .iter()
                .filter(|t| t.sales <= 0.0)
                .cloned()
                .collect(),
            duplicates: duplicates(transactions),
            outliers: outliers(transactions)?,
            missing_dates,
            weekday_average: weekday_average(&daily),
            monthly_average: monthly_average(set)?,
            daily,
        })
    }
}

fn group_totals<F>(transactions: &[Transaction], key: F) -> Vec<GroupTotal>
where
    F: Fn(&Transaction) -> Option<&str>,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for t in transactions {
        if let Some(name) = key(t) {
            let entry = groups.entry(name).or_insert((0.0, 0));
            entry.0 += t.sales;
            entry.1 += 1;
        }
    }

    let mut totals: Vec<GroupTotal> = groups
        .into_iter()
        .map(|(name, (sales, transactions))| GroupTotal {
            name: name.to_string(),
            sales,
            transactions,
        })
        .collect();
    totals.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    totals
}

fn duplicates(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .filter(|t| {
            let key = (
                t.date,
                t.category.as_str(),
                t.region.as_deref(),
                t.store.as_deref(),
                t.segment.as_deref(),
                t.sales.to_bits(),
            );
            !seen.insert(key)
        })
        .cloned()
        .collect()
}

fn outliers(transactions: &[Transaction]) -> Result<Vec<Transaction>> {
    let sales: Vec<f64> = transactions.iter().map(|t| t.sales).collect();
    let (low, high) = iqr_fences(&sales, 1.5)?;
    Ok(transactions
        .iter()
        .filter(|t| t.sales < low || t.sales > high)
        .cloned()
        .collect())
}

fn daily_totals(transactions: &[Transaction]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for t in transactions {
        *totals.entry(t.date).or_insert(0.0) += t.sales;
    }
    totals
}

fn calendar(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |d| *d <= last)
}

fn daily_missing_dates(
    transactions: &[Transaction],
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<NaiveDate> {
    let present: HashSet<NaiveDate> = transactions.iter().map(|t| t.date).collect();
    calendar(first, last).filter(|d| !present.contains(d)).collect()
}

fn daily_series(
    transactions: &[Transaction],
    first: NaiveDate,
    last: NaiveDate,
) -> Result<Vec<DailyPoint>> {
    let totals = daily_totals(transactions);
    let dates: Vec<NaiveDate> = calendar(first, last).collect();
    let sales: Vec<f64> = dates
        .iter()
        .map(|d| totals.get(d).copied().unwrap_or(0.0))
        .collect();

    let means = rolling_mean(&sales, ROLLING_WINDOW)?;
    let stds = rolling_std(&sales, ROLLING_WINDOW)?;

    Ok(dates
        .into_iter()
        .zip(sales)
        .zip(means.into_iter().zip(stds))
        .map(|((date, sales), (rolling_mean, rolling_std))| DailyPoint {
            date,
            sales,
            rolling_mean,
            rolling_std,
        })
        .collect())
}

fn weekday_average(daily: &[DailyPoint]) -> Vec<(String, f64)> {
    let mut sums = [0.0; 7];
    let mut counts = [0usize; 7];
    for point in daily {
        let i = point.date.weekday().num_days_from_monday() as usize;
        sums[i] += point.sales;
        counts[i] += 1;
    }

    let mut day = Weekday::Mon;
    let mut averages = Vec::with_capacity(7);
    for i in 0..7 {
        if counts[i] > 0 {
            averages.push((weekday_name(day).to_string(), sums[i] / counts[i] as f64));
        }
        day = day.succ();
    }
    averages
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn monthly_average(set: &TransactionSet) -> Result<Vec<(String, f64)>> {
    let (first, last) = set.date_range();
    // A single month cannot be aggregated into a series; average it directly.
    if Granularity::Monthly.period_start(first) == Granularity::Monthly.period_start(last) {
        let total = set.transactions().iter().map(|t| t.sales).sum();
        return Ok(vec![(first.format("%B").to_string(), total)]);
    }

    let overall = aggregate(set, Granularity::Monthly, &[])?;
    let mut sums = [0.0; 12];
    let mut counts = [0usize; 12];
    if let Some(series) = overall.first() {
        for point in series.points() {
            let m = point.period.month0() as usize;
            sums[m] += point.sales;
            counts[m] += 1;
        }
    }

    let mut averages = Vec::new();
    for m in 0..12 {
        if counts[m] > 0 {
            let name = NaiveDate::from_ymd_opt(2000, m as u32 + 1, 1)
                .map(|d| d.format("%B").to_string())
                .unwrap_or_default();
            averages.push((name, sums[m] / counts[m] as f64));
        }
    }
    Ok(averages)
}
