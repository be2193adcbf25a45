//! Query-string filters shared by the pages and exports

use crate::error::{DashboardError, Result};
use chrono::NaiveDate;
use sales_forecast::aggregate::SeriesKey;
use sales_forecast::models::{ForecastResult, ModelKind};
use sales_forecast::scenario::Scenario;
use sales_forecast::state::{ForecastState, SeriesBundle};
use serde::Deserialize;

/// Raw query parameters; empty strings count as absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub series: Option<String>,
    pub scenario: Option<String>,
    pub model: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Filters resolved against the loaded state
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub bundle: &'a SeriesBundle,
    pub scenario: &'a Scenario,
    pub model: Option<ModelKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                DashboardError::BadRequest(format!("{} must be a YYYY-MM-DD date, got '{}'", name, v))
            })
        })
        .transpose()
}

impl FilterParams {
    pub fn resolve<'a>(&self, state: &'a ForecastState) -> Result<Selection<'a>> {
        let bundle = match non_empty(&self.series) {
            None => state
                .overall()
                .ok_or_else(|| DashboardError::NotFound("overall series".to_string()))?,
            Some(raw) => {
                let key: SeriesKey = raw
                    .parse()
                    .map_err(|e| DashboardError::BadRequest(format!("{}", e)))?;
                state
                    .bundle(&key)
                    .ok_or_else(|| DashboardError::NotFound(format!("series '{}'", key)))?
            }
        };

        let scenario = match non_empty(&self.scenario) {
            None => state
                .scenario("Baseline")
                .or_else(|| state.scenarios.first())
                .ok_or_else(|| DashboardError::NotFound("no scenarios configured".to_string()))?,
            Some(name) => state
                .scenario(name)
                .ok_or_else(|| DashboardError::NotFound(format!("scenario '{}'", name)))?,
        };

        let model = non_empty(&self.model)
            .map(|m| {
                m.parse::<ModelKind>()
                    .map_err(|e| DashboardError::BadRequest(e.to_string()))
            })
            .transpose()?;

        let from = parse_date("from", non_empty(&self.from))?;
        let to = parse_date("to", non_empty(&self.to))?;
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(DashboardError::BadRequest(format!(
                    "from ({}) is after to ({})",
                    f, t
                )));
            }
        }

        Ok(Selection {
            bundle,
            scenario,
            model,
            from,
            to,
        })
    }
}

impl<'a> Selection<'a> {
    /// Forecast for the chosen model (fitted model by default), before scenario adjustment
    pub fn forecast(&self) -> Result<&'a ForecastResult> {
        let found = match self.model {
            Some(model) => self.bundle.forecast_for(model),
            None => self.bundle.primary_forecast(),
        };
        found.ok_or_else(|| {
            DashboardError::NotFound(format!(
                "no forecast available for {}",
                self.bundle.key.display_name()
            ))
        })
    }

    /// Scenario-adjusted forecast
    pub fn projected(&self) -> Result<ForecastResult> {
        Ok(self.scenario.project(self.forecast()?))
    }

    /// Query string reproducing this selection, for links
    pub fn query(&self) -> String {
        let mut parts = vec![
            format!("series={}", urlencoding::encode(&self.bundle.key.to_string())),
            format!("scenario={}", urlencoding::encode(&self.scenario.name)),
        ];
        if let Some(model) = self.model {
            parts.push(format!("model={}", model.id()));
        }
        if let Some(from) = self.from {
            parts.push(format!("from={}", from));
        }
        if let Some(to) = self.to {
            parts.push(format!("to={}", to));
        }
        parts.join("&")
    }
}
