//! Server-rendered HTML pages

use crate::filters::Selection;
use axum::http::StatusCode;
use sales_forecast::aggregate::SeriesPoint;
use sales_forecast::chart::{bar_chart_svg, escape_xml, line_chart_svg, ChartSpec};
use sales_forecast::models::{ForecastResult, ModelKind};
use sales_forecast::overview::{DatasetOverview, GroupTotal};
use sales_forecast::state::{ForecastState, SeriesBundle};
use sales_forecast::utils::{format_percent, format_thousands};
use log::error;
use std::fmt::{self, Write};

/// Rows shown for long lists such as missing dates or outliers
const LIST_LIMIT: usize = 10;

const STYLE: &str = r#"<style>
    body { font-family: sans-serif; margin: 0 2rem 2rem; color: #222; }
    nav { padding: 1rem 0; border-bottom: 1px solid #ddd; margin-bottom: 1rem; }
    nav a { margin-right: 1.5rem; text-decoration: none; color: #1f77b4; }
    nav a.active { font-weight: bold; }
    table { border-collapse: collapse; margin: 0.5rem 0 1.5rem; }
    th, td { border: 1px solid #ddd; padding: 0.3rem 0.7rem; text-align: right; }
    th:first-child, td:first-child { text-align: left; }
    .kpis { display: flex; gap: 1rem; margin: 1rem 0; }
    .kpi { border: 1px solid #ddd; border-radius: 6px; padding: 0.7rem 1rem; min-width: 12rem; }
    .kpi .value { font-size: 1.4rem; font-weight: bold; }
    .notice { background: #fff4e5; border-left: 4px solid #ff7f0e; padding: 0.5rem 1rem; margin: 0.5rem 0; }
    .insight { background: #eef6ff; border-left: 4px solid #1f77b4; padding: 0.5rem 1rem; }
    .best { background: #e8f5e9; }
    form label { margin-right: 1rem; }
</style>"#;

/// Render a page body inside the shared layout
fn page(title: &str, active: &str, body: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut html = String::new();
    if let Err(e) = write_page(&mut html, title, active, body) {
        error!("Failed to render page '{}': {}", title, e);
    }
    html
}

fn write_page(
    html: &mut String,
    title: &str,
    active: &str,
    body: impl FnOnce(&mut String) -> fmt::Result,
) -> fmt::Result {
    writeln!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{}</title>
{}
</head>
<body>
<nav>"#,
        escape_xml(title),
        STYLE
    )?;
    for (href, label) in [
        ("/", "Forecast"),
        ("/comparison", "Model Comparison"),
        ("/dataset", "Dataset"),
    ] {
        let class = if href == active { r#" class="active""# } else { "" };
        writeln!(html, r#"  <a href="{}"{}>{}</a>"#, href, class, label)?;
    }
    writeln!(html, "</nav>")?;
    body(html)?;
    writeln!(html, "</body>\n</html>")
}

fn series_select(options: &mut String, state: &ForecastState, selected: &SeriesBundle) -> fmt::Result {
    writeln!(options, "  <label>Series <select name=\"series\">")?;
    for bundle in &state.series {
        let sel = if bundle.key == selected.key { " selected" } else { "" };
        writeln!(
            options,
            r#"    <option value="{}"{}>{}</option>"#,
            escape_xml(&bundle.key.to_string()),
            sel,
            escape_xml(&bundle.key.display_name())
        )?;
    }
    writeln!(options, "  </select></label>")
}

fn notices(bundle: &SeriesBundle) -> String {
    bundle
        .notices
        .iter()
        .map(|n| format!("<div class=\"notice\">{}</div>\n", escape_xml(n)))
        .collect()
}

fn kpi(label: &str, value: &str) -> String {
    format!(
        "  <div class=\"kpi\"><div>{}</div><div class=\"value\">{}</div></div>\n",
        escape_xml(label),
        escape_xml(value)
    )
}

/// Main forecast page for the selected series and scenario
pub fn forecast_page(state: &ForecastState, selection: &Selection<'_>, projected: &ForecastResult) -> String {
    page("Sales Forecast", "/", |body| forecast_body(body, state, selection, projected))
}

fn forecast_body(
    body: &mut String,
    state: &ForecastState,
    selection: &Selection<'_>,
    projected: &ForecastResult,
) -> fmt::Result {
    let bundle = selection.bundle;
    let history = &bundle.history;
    let granularity = state.granularity;

    writeln!(
        body,
        "<h1>Sales Forecast Dashboard</h1>\n<p>{} forecast, trained {}. Showing {}.</p>",
        granularity,
        state.created_at.format("%Y-%m-%d %H:%M UTC"),
        escape_xml(&bundle.key.display_name())
    )?;

    // Filters
    writeln!(body, "<form method=\"get\" action=\"/\">")?;
    series_select(body, state, bundle)?;
    writeln!(body, "  <label>Scenario <select name=\"scenario\">")?;
    for scenario in &state.scenarios {
        let sel = if scenario.name == selection.scenario.name { " selected" } else { "" };
        writeln!(
            body,
            r#"    <option value="{}"{}>{}</option>"#,
            escape_xml(&scenario.name),
            sel,
            escape_xml(&scenario.label())
        )?;
    }
    writeln!(body, "  </select></label>")?;
    writeln!(body, "  <label>Model <select name=\"model\">")?;
    writeln!(body, r#"    <option value="">Default</option>"#)?;
    for model in ModelKind::ALL {
        let sel = if selection.model == Some(model) { " selected" } else { "" };
        writeln!(body, r#"    <option value="{}"{}>{}</option>"#, model.id(), sel, model)?;
    }
    writeln!(body, "  </select></label>")?;
    let date_value = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    writeln!(
        body,
        r#"  <label>From <input type="date" name="from" value="{}"></label>
  <label>To <input type="date" name="to" value="{}"></label>
  <button type="submit">Apply</button>
</form>"#,
        date_value(selection.from),
        date_value(selection.to)
    )?;

    body.push_str(&notices(bundle));

    // KPIs
    let horizon = projected.horizon();
    let recent: Vec<f64> = history.values().into_iter().rev().take(horizon).collect();
    let recent_total: f64 = recent.iter().sum();
    let change = if recent_total != 0.0 {
        format_percent(projected.total() / recent_total - 1.0)
    } else {
        "n/a".to_string()
    };
    writeln!(body, "<div class=\"kpis\">")?;
    body.push_str(&kpi(
        &format!("Forecast total, next {} periods", horizon),
        &format_thousands(projected.total()),
    ));
    body.push_str(&kpi(
        "Average per period",
        &format_thousands(projected.total() / horizon.max(1) as f64),
    ));
    body.push_str(&kpi(
        "Last observed period",
        &history
            .points()
            .last()
            .map(|p| format_thousands(p.sales))
            .unwrap_or_else(|| "n/a".to_string()),
    ));
    body.push_str(&kpi(&format!("Change vs last {} periods", recent.len()), &change));
    writeln!(body, "</div>")?;

    // Chart
    let spec = ChartSpec::new(format!(
        "{}: {} ({})",
        bundle.key.display_name(),
        projected.model(),
        selection.scenario.label()
    ))
    .with_history(history.slice_range(selection.from, selection.to))
    .with_forecast(projected.slice_range(selection.from, selection.to));
    writeln!(body, "<div class=\"chart\">\n{}</div>", line_chart_svg(&spec))?;

    // Forecast table
    writeln!(
        body,
        "<h2>Forecast, next {} periods</h2>\n<table>\n  <tr><th>Period</th><th>Forecast</th><th>Lower Bound</th><th>Upper Bound</th></tr>",
        horizon
    )?;
    for p in projected.points() {
        writeln!(
            body,
            "  <tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
            granularity.label(p.period),
            p.value,
            p.lower,
            p.upper
        )?;
    }
    writeln!(body, "</table>")?;

    writeln!(
        body,
        "<div class=\"insight\"><strong>{}</strong>: {}</div>",
        escape_xml(&selection.scenario.label()),
        escape_xml(selection.scenario.insight())
    )?;

    let query = selection.query();
    writeln!(
        body,
        r#"<p>Download: <a href="/export/forecast.csv?{q}">forecast table (CSV)</a> | <a href="/export/forecast.svg?{q}">chart (SVG)</a></p>"#,
        q = escape_xml(&query)
    )
}

/// Accuracy comparison of every candidate over the held-out window
pub fn comparison_page(state: &ForecastState, bundle: &SeriesBundle) -> String {
    page("Model Comparison", "/comparison", |body| comparison_body(body, state, bundle))
}

fn comparison_body(body: &mut String, state: &ForecastState, bundle: &SeriesBundle) -> fmt::Result {
    writeln!(body, "<h1>Model Comparison</h1>")?;
    writeln!(body, "<form method=\"get\" action=\"/comparison\">")?;
    series_select(body, state, bundle)?;
    writeln!(body, "  <button type=\"submit\">Apply</button>\n</form>")?;
    body.push_str(&notices(bundle));

    let Some(evaluation) = bundle.evaluation.as_ref() else {
        writeln!(
            body,
            "<p>No held-out evaluation is available for {}.</p>",
            escape_xml(&bundle.key.display_name())
        )?;
        return Ok(());
    };

    if let (Some(first), Some(last)) = (evaluation.periods.first(), evaluation.periods.last()) {
        writeln!(
            body,
            "<p>Held-out window: {} to {} ({} periods). All models are scored on the same window.</p>",
            state.granularity.label(*first),
            state.granularity.label(*last),
            evaluation.window_len()
        )?;
    }

    let best = evaluation.best_by_mae().map(|r| r.model);
    writeln!(
        body,
        "<h2>Forecast errors</h2>\n<table>\n  <tr><th>Model</th><th>MAE</th><th>MSE</th><th>RMSE</th><th>MAPE</th></tr>"
    )?;
    for record in evaluation.accuracy_table() {
        let class = if Some(record.model) == best { r#" class="best""# } else { "" };
        writeln!(
            body,
            "  <tr{}><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
            class,
            record.model,
            record.mae,
            record.mse,
            record.rmse,
            record.mape.map_or_else(|| "n/a".to_string(), format_percent)
        )?;
    }
    writeln!(body, "</table>")?;
    if let Some(model) = best {
        writeln!(body, "<p>Best model by MAE: <strong>{}</strong></p>", model)?;
    }
    writeln!(
        body,
        r#"<p><a href="/export/errors.csv?series={}">Download errors (CSV)</a></p>"#,
        escape_xml(&urlencoding::encode(&bundle.key.to_string()))
    )?;

    let table = evaluation.accuracy_table();
    let mae: Vec<(String, f64)> = table.iter().map(|r| (r.model.to_string(), r.mae)).collect();
    let rmse: Vec<(String, f64)> = table.iter().map(|r| (r.model.to_string(), r.rmse)).collect();
    writeln!(body, "<div class=\"chart\">\n{}</div>", bar_chart_svg("MAE by model", &mae))?;
    writeln!(body, "<div class=\"chart\">\n{}</div>", bar_chart_svg("RMSE by model", &rmse))?;

    for candidate in &evaluation.candidates {
        writeln!(
            body,
            "<h3>{}</h3>\n<table>\n  <tr><th>Period</th><th>Actual</th><th>Forecast</th><th>Error</th></tr>",
            candidate.forecast.model()
        )?;
        for ((period, actual), predicted) in evaluation
            .periods
            .iter()
            .zip(&evaluation.actual)
            .zip(candidate.forecast.values())
        {
            writeln!(
                body,
                "  <tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
                state.granularity.label(*period),
                actual,
                predicted,
                actual - predicted
            )?;
        }
        writeln!(body, "</table>")?;
    }
    Ok(())
}

fn group_table(html: &mut String, title: &str, groups: &[GroupTotal]) -> fmt::Result {
    if groups.is_empty() {
        return Ok(());
    }
    writeln!(
        html,
        "<h3>{}</h3>\n<table>\n  <tr><th>Name</th><th>Sales</th><th>Transactions</th></tr>",
        escape_xml(title)
    )?;
    for g in groups {
        writeln!(
            html,
            "  <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_xml(&g.name),
            format_thousands(g.sales),
            g.transactions
        )?;
    }
    writeln!(html, "</table>")
}

fn averages_table(html: &mut String, title: &str, header: &str, rows: &[(String, f64)]) -> fmt::Result {
    writeln!(
        html,
        "<h3>{}</h3>\n<table>\n  <tr><th>{}</th><th>Average sales</th></tr>",
        escape_xml(title),
        escape_xml(header)
    )?;
    for (name, value) in rows {
        writeln!(html, "  <tr><td>{}</td><td>{:.2}</td></tr>", escape_xml(name), value)?;
    }
    writeln!(html, "</table>")
}

fn overview_section(body: &mut String, overview: &DatasetOverview) -> fmt::Result {
    writeln!(
        body,
        "<h2>Overview</h2>\n<p>{} transactions from {} to {}, total sales {}.</p>",
        overview.rows,
        overview.first_date,
        overview.last_date,
        format_thousands(overview.total_sales)
    )?;

    group_table(body, "Sales by category", &overview.by_category)?;
    group_table(body, "Sales by region", &overview.by_region)?;
    group_table(body, "Sales by segment", &overview.by_segment)?;

    writeln!(
        body,
        "<h2>Data quality</h2>\n<table>\n  <tr><th>Check</th><th>Count</th></tr>\n  <tr><td>Invalid sales (zero or negative)</td><td>{}</td></tr>\n  <tr><td>Duplicate entries</td><td>{}</td></tr>\n  <tr><td>Outliers (1.5 IQR)</td><td>{}</td></tr>\n  <tr><td>Missing dates</td><td>{}</td></tr>\n</table>",
        overview.invalid_sales.len(),
        overview.duplicates.len(),
        overview.outliers.len(),
        overview.missing_dates.len()
    )?;

    if !overview.missing_dates.is_empty() {
        let shown: Vec<String> = overview
            .missing_dates
            .iter()
            .take(LIST_LIMIT)
            .map(|d| d.to_string())
            .collect();
        writeln!(body, "<p>Missing dates: {}</p>", shown.join(", "))?;
    }
    if !overview.outliers.is_empty() {
        writeln!(
            body,
            "<h3>Outliers</h3>\n<table>\n  <tr><th>Date</th><th>Category</th><th>Sales</th></tr>"
        )?;
        for t in overview.outliers.iter().take(LIST_LIMIT) {
            writeln!(
                body,
                "  <tr><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
                t.date,
                escape_xml(&t.category),
                t.sales
            )?;
        }
        writeln!(body, "</table>")?;
    }

    let daily: Vec<SeriesPoint> = overview
        .daily
        .iter()
        .map(|d| SeriesPoint {
            period: d.date,
            sales: d.sales,
        })
        .collect();
    writeln!(
        body,
        "<h2>Daily sales</h2>\n<div class=\"chart\">\n{}</div>",
        line_chart_svg(&ChartSpec::new("Daily sales").with_history(daily))
    )?;
    if let Some(last) = overview.daily.iter().rev().find(|d| d.rolling_mean.is_some()) {
        writeln!(
            body,
            "<p>30-day rolling mean on {}: {:.2}, rolling volatility: {}</p>",
            last.date,
            last.rolling_mean.unwrap_or_default(),
            last.rolling_std
                .map_or_else(|| "n/a".to_string(), |s| format!("{:.2}", s))
        )?;
    }

    averages_table(body, "Average daily sales by weekday", "Weekday", &overview.weekday_average)?;
    averages_table(body, "Average monthly sales by month", "Month", &overview.monthly_average)
}

/// Input profile, load report and dataset overview
pub fn dataset_page(state: &ForecastState) -> String {
    page("Dataset", "/dataset", |body| dataset_body(body, state))
}

fn dataset_body(body: &mut String, state: &ForecastState) -> fmt::Result {
    let report = &state.load_report;
    writeln!(
        body,
        "<h1>Dataset</h1>\n<h2>Load report</h2>\n<table>\n  <tr><th>Rows read</th><td>{}</td></tr>\n  <tr><th>Rows loaded</th><td>{}</td></tr>\n  <tr><th>Malformed rows</th><td>{}</td></tr>\n  <tr><th>Unparseable dates</th><td>{}</td></tr>\n  <tr><th>Non-numeric sales</th><td>{}</td></tr>\n  <tr><th>Missing category</th><td>{}</td></tr>\n</table>",
        report.rows_read,
        report.rows_loaded,
        report.malformed,
        report.bad_date,
        report.bad_sales,
        report.missing_category
    )?;

    if !state.columns.is_empty() {
        writeln!(
            body,
            "<h2>Columns</h2>\n<table>\n  <tr><th>Column</th><th>Type</th><th>Missing</th><th>Missing %</th><th>Distinct</th></tr>"
        )?;
        for c in &state.columns {
            writeln!(
                body,
                "  <tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                escape_xml(&c.name),
                escape_xml(&c.dtype),
                c.missing,
                c.missing_pct,
                c.distinct.map_or_else(|| "-".to_string(), |d| d.to_string())
            )?;
        }
        writeln!(body, "</table>")?;
    }

    match &state.overview {
        Some(overview) => overview_section(body, overview),
        None => writeln!(body, "<p>No dataset overview was recorded for this run.</p>"),
    }
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page("Error", "", |body| {
        writeln!(
            body,
            "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to the forecast</a></p>",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
            escape_xml(message)
        )
    })
}
