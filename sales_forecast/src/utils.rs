//! Utility functions for the sales_forecast crate

use chrono::NaiveDate;

/// Parse a date with one format.
///
/// Timestamps such as `2016-11-08 00:00:00` are accepted by trimming the
/// time part when the format does not match the full string.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, format).ok().or_else(|| {
        trimmed
            .split_once(|c: char| c == ' ' || c == 'T')
            .and_then(|(date, _)| NaiveDate::parse_from_str(date, format).ok())
    })
}

/// Choose the single format used for a whole date column.
///
/// The first format that parses every non-empty value wins. Otherwise the
/// format parsing the most values is used, earlier formats winning ties.
/// Returns `None` only when `formats` is empty.
pub fn detect_date_format<'a>(values: &[&str], formats: &'a [String]) -> Option<&'a str> {
    let non_empty: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    let mut best: Option<(&'a str, usize)> = None;
    for format in formats {
        let parsed = non_empty
            .iter()
            .filter(|v| parse_date(v, format).is_some())
            .count();
        if parsed == non_empty.len() {
            return Some(format.as_str());
        }
        if best.map_or(true, |(_, count)| parsed > count) {
            best = Some((format.as_str(), parsed));
        }
    }
    best.map(|(format, _)| format)
}

/// Parse a sales amount, tolerating a currency sign and thousands separators.
///
/// Non-finite values are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a fraction as a percentage with two decimals
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Format a number with thousands separators and no decimals
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
