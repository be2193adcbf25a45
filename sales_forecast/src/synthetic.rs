//! Seeded synthetic transaction generator
//!
//! Produces daily transactions with a linear trend, yearly seasonality and
//! Gaussian noise, laid out with the default column names so the output can be
//! fed straight back into [`crate::data::DataLoader`].

use crate::data::Transaction;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use csv::Writer;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub start: NaiveDate,
    pub months: u32,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    /// Transactions per day
    pub daily_transactions: usize,
    /// Mean sale amount at the start of the range
    pub base_amount: f64,
    /// Fractional growth of the mean amount per year
    pub yearly_growth: f64,
    /// Relative size of the yearly seasonal swing
    pub seasonality: f64,
    /// Standard deviation of the noise as a fraction of the mean amount
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            months: 48,
            categories: vec![
                "Furniture".to_string(),
                "Office Supplies".to_string(),
                "Technology".to_string(),
            ],
            regions: vec![
                "Central".to_string(),
                "East".to_string(),
                "South".to_string(),
                "West".to_string(),
            ],
            segments: vec![
                "Consumer".to_string(),
                "Corporate".to_string(),
                "Home Office".to_string(),
            ],
            daily_transactions: 5,
            base_amount: 200.0,
            yearly_growth: 0.08,
            seasonality: 0.25,
            noise: 0.3,
            seed: 42,
        }
    }
}

impl SyntheticConfig {
    fn validate(&self) -> Result<()> {
        if self.months == 0 {
            return Err(ForecastError::InvalidParameter(
                "months must be positive".to_string(),
            ));
        }
        if self.categories.is_empty() || self.regions.is_empty() || self.segments.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "categories, regions and segments must not be empty".to_string(),
            ));
        }
        let bad_amount = !self.base_amount.is_finite() || self.base_amount <= 0.0;
        if bad_amount || !self.noise.is_finite() || self.noise < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "base amount must be positive and noise non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generate transactions covering `config.months` months from `config.start`
pub fn generate(config: &SyntheticConfig) -> Result<Vec<Transaction>> {
    config.validate()?;

    let end = config
        .start
        .checked_add_months(Months::new(config.months))
        .ok_or_else(|| ForecastError::InvalidParameter("date range overflows".to_string()))?;
    let noise = Normal::new(0.0, config.noise)
        .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut transactions = Vec::new();
    for date in config.start.iter_days().take_while(|d| *d < end) {
        let years = (date - config.start).num_days() as f64 / 365.25;
        let season = (2.0 * PI * f64::from(date.ordinal0()) / 365.25).sin();
        let mean = config.base_amount
            * (1.0 + config.yearly_growth * years)
            * (1.0 + config.seasonality * season);

        for _ in 0..config.daily_transactions {
            let category = &config.categories[rng.gen_range(0..config.categories.len())];
            let region = &config.regions[rng.gen_range(0..config.regions.len())];
            let segment = &config.segments[rng.gen_range(0..config.segments.len())];
            let amount = (mean * (1.0 + noise.sample(&mut rng))).max(1.0);

            transactions.push(Transaction {
                date,
                category: category.clone(),
                region: Some(region.clone()),
                store: None,
                segment: Some(segment.clone()),
                sales: (amount * 100.0).round() / 100.0,
            });
        }
    }
    Ok(transactions)
}

/// Write transactions with the default Superstore-style headers
pub fn write_csv<P: AsRef<Path>>(path: P, transactions: &[Transaction]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Order Date", "Category", "Region", "Segment", "Sales"])?;
    for t in transactions {
        writer.write_record([
            t.date.format("%m/%d/%Y").to_string(),
            t.category.clone(),
            t.region.clone().unwrap_or_default(),
            t.segment.clone().unwrap_or_default(),
            format!("{:.2}", t.sales),
        ])?;
    }
    writer.flush()?;

    info!(
        "Wrote {} synthetic transactions to {}",
        transactions.len(),
        path.display()
    );
    Ok(())
}
