//! Aggregation of transactions into contiguous per-period sales series

use crate::data::{Transaction, TransactionSet};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Calendar period used to bucket transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Granularity {
    /// First day of the period containing `date`
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(date),
            Granularity::Monthly => date.with_day(1).unwrap_or(date),
        }
    }

    /// Start of the period following `period`
    pub fn next(&self, period: NaiveDate) -> Result<NaiveDate> {
        let next = match self {
            Granularity::Daily => period.checked_add_days(Days::new(1)),
            Granularity::Weekly => period.checked_add_days(Days::new(7)),
            Granularity::Monthly => period.checked_add_months(Months::new(1)),
        };
        next.ok_or_else(|| ForecastError::DataError(format!("date overflow after {}", period)))
    }

    /// Human-readable label for a period start
    pub fn label(&self, period: NaiveDate) -> String {
        match self {
            Granularity::Monthly => period.format("%Y-%m").to_string(),
            Granularity::Weekly => {
                let week = period.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Daily => period.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn default_moving_average_window(&self) -> usize {
        match self {
            Granularity::Daily => 7,
            Granularity::Weekly => 4,
            Granularity::Monthly => 3,
        }
    }

    pub fn default_season_length(&self) -> usize {
        match self {
            Granularity::Daily => 7,
            Granularity::Weekly => 52,
            Granularity::Monthly => 12,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "d" => Ok(Granularity::Daily),
            "weekly" | "w" => Ok(Granularity::Weekly),
            "monthly" | "m" => Ok(Granularity::Monthly),
            other => Err(ForecastError::InvalidParameter(format!(
                "unsupported granularity '{}'",
                other
            ))),
        }
    }
}

/// Attribute a series is grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Overall,
    Category,
    Region,
    Store,
    Segment,
}

impl Dimension {
    fn value_of<'a>(&self, t: &'a Transaction) -> Option<&'a str> {
        match self {
            Dimension::Overall => None,
            Dimension::Category => Some(t.category.as_str()),
            Dimension::Region => t.region.as_deref(),
            Dimension::Store => t.store.as_deref(),
            Dimension::Segment => t.segment.as_deref(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Overall => "overall",
            Dimension::Category => "category",
            Dimension::Region => "region",
            Dimension::Store => "store",
            Dimension::Segment => "segment",
        }
    }
}

impl FromStr for Dimension {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "overall" | "all" => Ok(Dimension::Overall),
            "category" => Ok(Dimension::Category),
            "region" => Ok(Dimension::Region),
            "store" => Ok(Dimension::Store),
            "segment" => Ok(Dimension::Segment),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown dimension '{}'",
                other
            ))),
        }
    }
}

/// Identifies one aggregated series, e.g. `category:Furniture`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub dimension: Dimension,
    pub value: String,
}

impl SeriesKey {
    pub fn overall() -> Self {
        Self {
            dimension: Dimension::Overall,
            value: "All".to_string(),
        }
    }

    pub fn new(dimension: Dimension, value: impl Into<String>) -> Self {
        if dimension == Dimension::Overall {
            return Self::overall();
        }
        Self {
            dimension,
            value: value.into(),
        }
    }

    pub fn is_overall(&self) -> bool {
        self.dimension == Dimension::Overall
    }

    /// Label shown in filters, e.g. `Region: West`
    pub fn display_name(&self) -> String {
        if self.is_overall() {
            return "All Sales".to_string();
        }
        let dim = self.dimension.as_str();
        let mut chars = dim.chars();
        let title: String = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        format!("{}: {}", title, self.value)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_overall() {
            f.write_str("overall")
        } else {
            write!(f, "{}:{}", self.dimension.as_str(), self.value)
        }
    }
}

impl FromStr for SeriesKey {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            None => match s.parse::<Dimension>()? {
                Dimension::Overall => Ok(SeriesKey::overall()),
                other => Err(ForecastError::InvalidParameter(format!(
                    "series key '{}' needs a value, e.g. {}:<name>",
                    s,
                    other.as_str()
                ))),
            },
            Some((dim, value)) => {
                let dimension = dim.parse::<Dimension>()?;
                if value.is_empty() && dimension != Dimension::Overall {
                    return Err(ForecastError::InvalidParameter(format!(
                        "series key '{}' has an empty value",
                        s
                    )));
                }
                Ok(SeriesKey::new(dimension, value))
            }
        }
    }
}

/// One observed period of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: NaiveDate,
    pub sales: f64,
}

/// Contiguous, strictly increasing per-period sales totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSeries {
    key: SeriesKey,
    granularity: Granularity,
    points: Vec<SeriesPoint>,
}

impl SalesSeries {
    /// Build a series from values starting at `start`, validating contiguity
    pub fn from_values(
        key: SeriesKey,
        granularity: Granularity,
        start: NaiveDate,
        values: &[f64],
    ) -> Result<Self> {
        let mut points = Vec::with_capacity(values.len());
        let mut period = granularity.period_start(start);
        for (i, &sales) in values.iter().enumerate() {
            if i > 0 {
                period = granularity.next(period)?;
            }
            points.push(SeriesPoint { period, sales });
        }
        Ok(Self {
            key,
            granularity,
            points,
        })
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.sales).collect()
    }

    pub fn periods(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.period).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_period(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.period)
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.sales).sum()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            None
        } else {
            Some(self.total() / self.points.len() as f64)
        }
    }

    /// The `horizon` period starts following the last observation
    pub fn future_periods(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        let mut period = self.last_period().ok_or_else(|| {
            ForecastError::DataError("cannot extend an empty series".to_string())
        })?;
        let mut periods = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            period = self.granularity.next(period)?;
            periods.push(period);
        }
        Ok(periods)
    }

    /// Split off the last `test_periods` observations as a held-out window
    pub fn split_holdout(&self, test_periods: usize) -> Result<(SalesSeries, SalesSeries)> {
        if test_periods == 0 || test_periods >= self.points.len() {
            return Err(ForecastError::InsufficientHistory(format!(
                "cannot hold out {} of {} periods",
                test_periods,
                self.points.len()
            )));
        }
        let split = self.points.len() - test_periods;
        let train = Self {
            key: self.key.clone(),
            granularity: self.granularity,
            points: self.points[..split].to_vec(),
        };
        let test = Self {
            key: self.key.clone(),
            granularity: self.granularity,
            points: self.points[split..].to_vec(),
        };
        Ok((train, test))
    }

    /// Points whose period falls within the inclusive range
    pub fn slice_range(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<SeriesPoint> {
        self.points
            .iter()
            .filter(|p| from.map_or(true, |f| p.period >= f) && to.map_or(true, |t| p.period <= t))
            .copied()
            .collect()
    }
}

/// Group transactions by period (and by each requested dimension) and sum sales.
///
/// The overall series comes first, followed by one series per distinct value of
/// each dimension in the order given, values sorted alphabetically. Every series
/// spans the same global period range, with empty periods filled with zero.
pub fn aggregate(
    set: &TransactionSet,
    granularity: Granularity,
    dimensions: &[Dimension],
) -> Result<Vec<SalesSeries>> {
    let (first, last) = set.date_range();
    let start = granularity.period_start(first);
    let end = granularity.period_start(last);

    let mut periods = vec![start];
    while let Some(&current) = periods.last() {
        if current >= end {
            break;
        }
        periods.push(granularity.next(current)?);
    }

    if periods.len() < 2 {
        return Err(ForecastError::InsufficientHistory(format!(
            "data from {} to {} covers only {} {} period; at least 2 are required",
            first,
            last,
            periods.len(),
            granularity
        )));
    }

    let index: BTreeMap<NaiveDate, usize> =
        periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();

    let mut series = Vec::new();
    series.push(build_series(
        SeriesKey::overall(),
        granularity,
        &periods,
        &index,
        set.transactions().iter(),
    )?);

    for dimension in dimensions {
        if *dimension == Dimension::Overall {
            continue;
        }
        let values: BTreeSet<&str> = set
            .transactions()
            .iter()
            .filter_map(|t| dimension.value_of(t))
            .collect();
        if values.is_empty() {
            debug!("No values for dimension '{}', skipping", dimension.as_str());
        }
        for value in values {
            let members = set
                .transactions()
                .iter()
                .filter(|t| dimension.value_of(t) == Some(value));
            series.push(build_series(
                SeriesKey::new(*dimension, value),
                granularity,
                &periods,
                &index,
                members,
            )?);
        }
    }

    debug!(
        "Aggregated {} transactions into {} series of {} {} periods",
        set.len(),
        series.len(),
        periods.len(),
        granularity
    );
    Ok(series)
}

fn build_series<'a>(
    key: SeriesKey,
    granularity: Granularity,
    periods: &[NaiveDate],
    index: &BTreeMap<NaiveDate, usize>,
    transactions: impl Iterator<Item = &'a Transaction>,
) -> Result<SalesSeries> {
    let mut totals = vec![0.0; periods.len()];
    for t in transactions {
        if let Some(&i) = index.get(&granularity.period_start(t.date)) {
            totals[i] += t.sales;
        }
    }

    if let Some((period, _)) = periods.iter().zip(&totals).find(|(_, total)| !total.is_finite()) {
        return Err(ForecastError::DataError(format!(
            "sales total for {} in {} overflows",
            key.display_name(),
            granularity.label(*period)
        )));
    }

    Ok(SalesSeries {
        key,
        granularity,
        points: periods
            .iter()
            .zip(totals)
            .map(|(&period, sales)| SeriesPoint { period, sales })
            .collect(),
    })
}
