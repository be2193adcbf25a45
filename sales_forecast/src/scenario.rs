//! What-if growth scenarios applied to an existing forecast
//!
//! Projection is presentational only: point estimates and both bounds are
//! scaled by `1 + growth`, nothing is re-estimated.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastPoint, ForecastResult};
use serde::{Deserialize, Serialize};

/// A named growth assumption, e.g. `Optimistic` at +10%
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Fractional growth, -0.10 for a 10% reduction
    pub growth: f64,
}

impl Scenario {
    pub fn new(name: impl Into<String>, growth: f64) -> Result<Self> {
        let scenario = Self {
            name: name.into(),
            growth,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Conservative, Baseline, Optimistic and Aggressive
    pub fn defaults() -> Vec<Scenario> {
        vec![
            Scenario {
                name: "Conservative".to_string(),
                growth: -0.10,
            },
            Scenario {
                name: "Baseline".to_string(),
                growth: 0.0,
            },
            Scenario {
                name: "Optimistic".to_string(),
                growth: 0.10,
            },
            Scenario {
                name: "Aggressive".to_string(),
                growth: 0.20,
            },
        ]
    }

    /// Case-insensitive lookup by name
    pub fn find<'a>(scenarios: &'a [Scenario], name: &str) -> Option<&'a Scenario> {
        scenarios.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ForecastError::ConfigError(
                "scenario name must not be empty".to_string(),
            ));
        }
        if !self.growth.is_finite() || self.growth <= -1.0 {
            return Err(ForecastError::ConfigError(format!(
                "scenario '{}' growth must be finite and greater than -100%",
                self.name
            )));
        }
        Ok(())
    }

    pub fn multiplier(&self) -> f64 {
        1.0 + self.growth
    }

    /// Label like `Conservative (-10%)`
    pub fn label(&self) -> String {
        let pct = self.growth * 100.0;
        if pct > 0.0 {
            format!("{} (+{:.0}%)", self.name, pct)
        } else {
            format!("{} ({:.0}%)", self.name, pct)
        }
    }

    /// Scale every point estimate and bound of `forecast`
    pub fn project(&self, forecast: &ForecastResult) -> ForecastResult {
        let m = self.multiplier();
        let points = forecast
            .points()
            .iter()
            .map(|p| ForecastPoint {
                period: p.period,
                value: p.value * m,
                lower: p.lower * m,
                upper: p.upper * m,
            })
            .collect();
        ForecastResult::from_points(forecast.model(), points)
    }

    /// Planning note for this growth level
    pub fn insight(&self) -> &'static str {
        if self.growth >= 0.15 {
            "Aggressive growth scenario selected. Plan for higher inventory and operational capacity."
        } else if self.growth > 0.0 {
            "Moderate growth expected. Gradual scaling recommended."
        } else if self.growth < 0.0 {
            "Conservative scenario selected. Focus on cost control and promotions."
        } else {
            "Baseline scenario selected. Maintain current strategy."
        }
    }
}
