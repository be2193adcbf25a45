//! Standalone SVG charts for the dashboard and downloads

use crate::aggregate::SeriesPoint;
use crate::models::ForecastPoint;
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

const HISTORY_COLOR: &str = "#1f77b4";
const FORECAST_COLOR: &str = "#ff7f0e";
const BAND_COLOR: &str = "#ffbb78";
const BAR_COLOR: &str = "#2ca02c";

/// Contents and size of a history + forecast line chart
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub history: Vec<SeriesPoint>,
    pub forecast: Vec<ForecastPoint>,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            history: Vec::new(),
            forecast: Vec::new(),
            width: 800,
            height: 400,
        }
    }

    pub fn with_history(mut self, history: Vec<SeriesPoint>) -> Self {
        self.history = history;
        self
    }

    pub fn with_forecast(mut self, forecast: Vec<ForecastPoint>) -> Self {
        self.forecast = forecast;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Escape text for use inside SVG/HTML elements and attributes
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

struct Scale {
    x_min: i64,
    x_span: f64,
    y_min: f64,
    y_span: f64,
}

impl Scale {
    fn x(&self, frame: &Frame, date: NaiveDate) -> f64 {
        let days = (date.num_days_from_ce() as i64 - self.x_min) as f64;
        frame.left + days / self.x_span * frame.width
    }

    fn y(&self, frame: &Frame, value: f64) -> f64 {
        frame.top + frame.height - (value - self.y_min) / self.y_span * frame.height
    }
}

fn open_svg(svg: &mut String, width: u32, height: u32, title: &str) {
    writeln!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = width,
        h = height
    )
    .ok();
    writeln!(
        svg,
        r#"<style>
    .title {{ font-family: sans-serif; font-size: 16px; fill: #333; }}
    .axis {{ font-family: sans-serif; font-size: 11px; fill: #666; }}
</style>"#
    )
    .ok();
    writeln!(svg, r#"<rect width="{}" height="{}" fill="white" />"#, width, height).ok();
    writeln!(
        svg,
        r#"<text class="title" x="{}" y="24" text-anchor="middle">{}</text>"#,
        width / 2,
        escape_xml(title)
    )
    .ok();
}

fn polyline(svg: &mut String, points: &[(f64, f64)], color: &str, dashed: bool) {
    if points.is_empty() {
        return;
    }
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect();
    let dash = if dashed { r#" stroke-dasharray="6 4""# } else { "" };
    writeln!(
        svg,
        r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="2"{} />"#,
        coords.join(" "),
        color,
        dash
    )
    .ok();
}

/// Line chart of the observed history, the forecast and its interval band
pub fn line_chart_svg(spec: &ChartSpec) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, spec.width, spec.height, &spec.title);

    let frame = Frame {
        left: 70.0,
        top: 40.0,
        width: f64::from(spec.width) - 90.0,
        height: f64::from(spec.height) - 80.0,
    };

    let dates: Vec<NaiveDate> = spec
        .history
        .iter()
        .map(|p| p.period)
        .chain(spec.forecast.iter().map(|p| p.period))
        .collect();
    let values: Vec<f64> = spec
        .history
        .iter()
        .map(|p| p.sales)
        .chain(spec.forecast.iter().flat_map(|p| [p.value, p.lower, p.upper]))
        .collect();

    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        writeln!(
            svg,
            r#"<text class="axis" x="{}" y="{}" text-anchor="middle">No data in range</text>"#,
            spec.width / 2,
            spec.height / 2
        )
        .ok();
        writeln!(svg, "</svg>").ok();
        return svg;
    };

    let y_min = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let y_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let x_min = first.num_days_from_ce() as i64;
    let scale = Scale {
        x_min,
        x_span: ((last.num_days_from_ce() as i64 - x_min) as f64).max(1.0),
        y_min,
        y_span: if y_max > y_min { y_max - y_min } else { 1.0 },
    };

    // Axes with min/max labels
    let bottom = frame.top + frame.height;
    writeln!(
        svg,
        r##"  <line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="#999" />
  <line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="#999" />"##,
        l = frame.left,
        r = frame.left + frame.width,
        t = frame.top,
        b = bottom
    )
    .ok();
    for (value, y) in [(y_min, bottom), (scale.y_min + scale.y_span, frame.top)] {
        writeln!(
            svg,
            r#"  <text class="axis" x="{:.1}" y="{:.1}" text-anchor="end">{:.0}</text>"#,
            frame.left - 6.0,
            y + 4.0,
            value
        )
        .ok();
    }
    for date in [first, last] {
        writeln!(
            svg,
            r#"  <text class="axis" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            scale.x(&frame, *date),
            bottom + 18.0,
            date.format("%Y-%m-%d")
        )
        .ok();
    }

    if !spec.forecast.is_empty() {
        let upper = spec
            .forecast
            .iter()
            .map(|p| (scale.x(&frame, p.period), scale.y(&frame, p.upper)));
        let lower = spec
            .forecast
            .iter()
            .rev()
            .map(|p| (scale.x(&frame, p.period), scale.y(&frame, p.lower)));
        let band: Vec<String> = upper
            .chain(lower)
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect();
        writeln!(
            svg,
            r#"  <polygon points="{}" fill="{}" fill-opacity="0.4" stroke="none" />"#,
            band.join(" "),
            BAND_COLOR
        )
        .ok();
    }

    let history: Vec<(f64, f64)> = spec
        .history
        .iter()
        .map(|p| (scale.x(&frame, p.period), scale.y(&frame, p.sales)))
        .collect();
    polyline(&mut svg, &history, HISTORY_COLOR, false);

    // Join the forecast to the last observation
    let forecast: Vec<(f64, f64)> = history
        .last()
        .copied()
        .into_iter()
        .chain(
            spec.forecast
                .iter()
                .map(|p| (scale.x(&frame, p.period), scale.y(&frame, p.value))),
        )
        .collect();
    if !spec.forecast.is_empty() {
        polyline(&mut svg, &forecast, FORECAST_COLOR, true);
    }

    writeln!(svg, "</svg>").ok();
    svg
}

/// Horizontal bars, one per labelled value
pub fn bar_chart_svg(title: &str, bars: &[(String, f64)]) -> String {
    let width = 600u32;
    let bar_height = 28.0;
    let gap = 10.0;
    let label_width = 150.0;
    let top = 40.0;
    let height = (top + bars.len() as f64 * (bar_height + gap) + gap).ceil() as u32;

    let mut svg = String::new();
    open_svg(&mut svg, width, height.max(80), title);

    let max = bars
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let track = f64::from(width) - label_width - 90.0;

    for (i, (label, value)) in bars.iter().enumerate() {
        let y = top + i as f64 * (bar_height + gap);
        let length = if max > 0.0 && value.is_finite() {
            (value.max(0.0) / max) * track
        } else {
            0.0
        };
        writeln!(
            svg,
            r#"  <text class="axis" x="{:.1}" y="{:.1}" text-anchor="end">{}</text>
  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" />
  <text class="axis" x="{:.1}" y="{:.1}">{:.2}</text>"#,
            label_width - 8.0,
            y + bar_height / 2.0 + 4.0,
            escape_xml(label),
            label_width,
            y,
            length,
            bar_height,
            BAR_COLOR,
            label_width + length + 6.0,
            y + bar_height / 2.0 + 4.0,
            value
        )
        .ok();
    }

    writeln!(svg, "</svg>").ok();
    svg
}
