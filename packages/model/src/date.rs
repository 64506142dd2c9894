//! Date normalizer
//!
//! Parses the date shapes a CV author may write and renders canonical
//! dates back to display strings.
//!
//! # Accepted Inputs
//!
//! | Input          | Granularity  | Canonical value      |
//! |----------------|--------------|----------------------|
//! | `2020` / `"2020"` | year only | 2020-01-01           |
//! | `"2020-05"`    | year-month   | 2020-05-01           |
//! | `"2020-05-17"` | full         | 2020-05-17           |
//! | `"present"`    | present      | the reference date   |
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use rendercv_model::date::{parse, RawDate};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let date = parse(&RawDate::from("2020-06"), today).unwrap();
//! assert_eq!(date.display(), "June 2020");
//!
//! let year = parse(&RawDate::Integer(2020), today).unwrap();
//! assert_eq!(year.display(), "2020");
//! ```

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config;

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, digits only.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})(?:-([0-9]{2})(?:-([0-9]{2}))?)?$").expect("valid regex")
});

/// Why a raw date could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("'{0}' is not a valid date; use YYYY-MM-DD, YYYY-MM, YYYY or \"present\"")]
    InvalidFormat(String),

    #[error("month {month} in '{raw}' is out of range (1-12)")]
    InvalidMonth { raw: String, month: u32 },

    #[error("'{raw}' is not a valid calendar date")]
    InvalidDay { raw: String },

    #[error("year {year} is out of range ({min}-{max})")]
    YearOutOfRange { year: i64, min: i32, max: i32 },
}

/// Precision of a parsed date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// `YYYY-MM-DD`
    Full,
    /// `YYYY-MM`
    YearMonth,
    /// `YYYY`
    YearOnly,
}

/// A calendar date together with the precision it was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalDate {
    date: NaiveDate,
    granularity: Granularity,
}

impl CanonicalDate {
    pub fn new(date: NaiveDate, granularity: Granularity) -> Self {
        Self { date, granularity }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Display form, see [`format`].
    pub fn format(&self) -> String {
        format(self)
    }
}

/// A parsed date: either explicit or the present-marker.
///
/// The present-marker remembers the reference date it resolved to, but it
/// never equals an explicit date with the same calendar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DateValue {
    Explicit(CanonicalDate),
    Present(NaiveDate),
}

impl DateValue {
    /// Calendar value (the reference date for the present-marker).
    pub fn date(&self) -> NaiveDate {
        match self {
            DateValue::Explicit(canonical) => canonical.date(),
            DateValue::Present(today) => *today,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, DateValue::Present(_))
    }

    /// Whether this was written as a bare year.
    pub fn is_year_only(&self) -> bool {
        matches!(
            self,
            DateValue::Explicit(CanonicalDate {
                granularity: Granularity::YearOnly,
                ..
            })
        )
    }

    /// Whether this is an explicit date after `today`.
    pub fn is_future(&self, today: NaiveDate) -> bool {
        match self {
            DateValue::Explicit(canonical) => canonical.date() > today,
            DateValue::Present(_) => false,
        }
    }

    /// `"Jan. 2020"`, `"2020"` or `"present"`.
    pub fn display(&self) -> String {
        match self {
            DateValue::Explicit(canonical) => canonical.format(),
            DateValue::Present(_) => config::PRESENT.to_string(),
        }
    }

    /// `"2020"` or `"present"`.
    pub fn year_display(&self) -> String {
        match self {
            DateValue::Explicit(canonical) => canonical.year().to_string(),
            DateValue::Present(_) => config::PRESENT.to_string(),
        }
    }
}

/// A date as it appears in the input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    /// A bare integer year
    Integer(i64),
    /// Any textual form
    Text(String),
    /// An already-typed calendar date
    Date(NaiveDate),
}

impl RawDate {
    /// Interpret a raw document value as a date input.
    ///
    /// Returns `None` for values that cannot possibly be dates (lists,
    /// mappings, booleans, non-integer numbers).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(RawDate::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(RawDate::Integer),
            _ => None,
        }
    }
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDate::Integer(year) => write!(f, "{year}"),
            RawDate::Text(text) => write!(f, "{text}"),
            RawDate::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for RawDate {
    fn from(s: &str) -> Self {
        RawDate::Text(s.to_string())
    }
}

impl From<String> for RawDate {
    fn from(s: String) -> Self {
        RawDate::Text(s)
    }
}

impl From<i64> for RawDate {
    fn from(year: i64) -> Self {
        RawDate::Integer(year)
    }
}

impl From<i32> for RawDate {
    fn from(year: i32) -> Self {
        RawDate::Integer(year as i64)
    }
}

impl From<NaiveDate> for RawDate {
    fn from(date: NaiveDate) -> Self {
        RawDate::Date(date)
    }
}

/// Parse a raw date against the reference date `today`.
///
/// Future dates are accepted here; rejecting them is up to the caller,
/// which knows whether the field allows it.
pub fn parse(raw: &RawDate, today: NaiveDate) -> Result<DateValue, DateError> {
    match raw {
        RawDate::Integer(year) => {
            let year = checked_year(*year)?;
            year_start(year, &raw.to_string())
        }
        RawDate::Text(text) => parse_text(text, today),
        RawDate::Date(date) => {
            checked_year(i64::from(date.year()))?;
            Ok(DateValue::Explicit(CanonicalDate::new(
                *date,
                Granularity::Full,
            )))
        }
    }
}

fn parse_text(text: &str, today: NaiveDate) -> Result<DateValue, DateError> {
    if text == config::PRESENT {
        return Ok(DateValue::Present(today));
    }

    let captures = DATE_PATTERN
        .captures(text)
        .ok_or_else(|| DateError::InvalidFormat(text.to_string()))?;

    let number = |i: usize| -> Result<Option<u32>, DateError> {
        captures
            .get(i)
            .map(|m| {
                m.as_str()
                    .parse::<u32>()
                    .map_err(|_| DateError::InvalidFormat(text.to_string()))
            })
            .transpose()
    };
    let year = number(1)?.ok_or_else(|| DateError::InvalidFormat(text.to_string()))?;
    let year = checked_year(i64::from(year))?;

    match (number(2)?, number(3)?) {
        (None, _) => year_start(year, text),
        (Some(month), day) => {
            if !(1..=12).contains(&month) {
                return Err(DateError::InvalidMonth {
                    raw: text.to_string(),
                    month,
                });
            }
            let (day, granularity) = match day {
                Some(day) => (day, Granularity::Full),
                None => (1, Granularity::YearMonth),
            };
            let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                DateError::InvalidDay {
                    raw: text.to_string(),
                }
            })?;
            Ok(DateValue::Explicit(CanonicalDate::new(date, granularity)))
        }
    }
}

fn checked_year(year: i64) -> Result<i32, DateError> {
    if year < i64::from(config::MIN_YEAR) || year > i64::from(config::MAX_YEAR) {
        return Err(DateError::YearOutOfRange {
            year,
            min: config::MIN_YEAR,
            max: config::MAX_YEAR,
        });
    }
    // Bounded by the check above
    Ok(year as i32)
}

fn year_start(year: i32, raw: &str) -> Result<DateValue, DateError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| DateValue::Explicit(CanonicalDate::new(date, Granularity::YearOnly)))
        .ok_or_else(|| DateError::InvalidFormat(raw.to_string()))
}

/// Render a canonical date for display.
///
/// Full and year-month dates render as `"{Month} {Year}"` using
/// [`config::MONTH_ABBREVIATIONS`]; year-only dates render as the year.
pub fn format(date: &CanonicalDate) -> String {
    match date.granularity() {
        Granularity::YearOnly => date.year().to_string(),
        Granularity::Full | Granularity::YearMonth => format_month_year(date.date()),
    }
}

/// `"{Month} {Year}"` for any calendar date.
pub fn format_month_year(date: NaiveDate) -> String {
    let month = config::MONTH_ABBREVIATIONS[date.month0() as usize];
    format!("{month} {}", date.year())
}
