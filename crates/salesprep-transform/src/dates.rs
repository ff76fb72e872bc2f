//! Date parsing strategies for vendor exports.
//!
//! Canonical dates are ISO `YYYY-MM-DD` strings.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How a lab's invoice dates are written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DateStrategy {
    /// Explicit `dd/mm/yyyy`. Rows equal to the sentinel are removed first.
    DayFirst { sentinel: Option<String> },
    /// ISO, then day-first, then month-first forms.
    #[default]
    Inferred,
    /// Rows equal to the sentinel are removed, the rest are inferred.
    DropSentinel { sentinel: String },
    /// Values are already ISO dates or date-times.
    AlreadyTyped,
}

impl DateStrategy {
    /// True when a row carrying this value is removed before parsing.
    pub fn is_sentinel(&self, value: &str) -> bool {
        match self {
            Self::DayFirst {
                sentinel: Some(sentinel),
            }
            | Self::DropSentinel { sentinel } => value.trim() == sentinel.trim(),
            _ => false,
        }
    }

    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        match self {
            Self::DayFirst { .. } => NaiveDate::parse_from_str(value, "%d/%m/%Y")
                .ok()
                .or_else(|| parse_iso(value)),
            Self::Inferred | Self::DropSentinel { .. } => parse_inferred(value),
            Self::AlreadyTyped => parse_iso(value),
        }
    }
}

/// ISO date or date-time.
fn parse_iso(value: &str) -> Option<NaiveDate> {
    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|dt| dt.date())
    })
}

/// Parses a date written in any of the forms seen in lab exports.
///
/// Day-first is tried before month-first, so `01/03/2024` is 1 March.
pub fn parse_inferred(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(date) = parse_iso(value) {
        return Some(date);
    }

    let datetime_formats = [
        "%Y/%m/%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S", // European
        "%d/%m/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S", // US
        "%m/%d/%Y %H:%M",
        "%d-%b-%Y %H:%M:%S",
    ];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    let date_formats = [
        "%Y/%m/%d",
        "%d/%m/%Y",  // European: 15/01/2024
        "%m/%d/%Y",  // US: 01/15/2024
        "%d-%m-%Y",  // 15-01-2024
        "%d.%m.%Y",  // 15.01.2024
        "%d-%b-%Y",  // 15-Jan-2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
    ];
    date_formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Parses a month label such as `March 2024`, `Mar 2024`, `03/2024` or
/// `2024-03` to the first day of that month.
pub fn parse_month_label(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let formats = ["%B %Y", "%b %Y", "%m/%Y", "%Y-%m"];
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&format!("{value} 01"), &format!("{fmt} %d")).ok()
    })
}

/// Month number from `3`, `03`, `3.0`, `Mar` or `March`.
pub fn month_number(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(number) = value.parse::<f64>() {
        return (number.fract() == 0.0 && (1.0..=12.0).contains(&number)).then_some(number as u32);
    }
    ["%B", "%b"].iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&format!("{value} 1 2000"), &format!("{fmt} %d %Y"))
            .ok()
            .map(|date| date.month())
    })
}

/// Year number from `2024` or `2024.0`.
pub fn year_number(value: &str) -> Option<i32> {
    let number = value.trim().parse::<f64>().ok()?;
    (number.fract() == 0.0 && (1900.0..=2100.0).contains(&number)).then_some(number as i32)
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
