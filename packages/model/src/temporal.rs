//! Temporal entry model
//!
//! Every entry with a timeline carries a [`TemporalSpan`] built from the
//! raw `start_date`, `end_date` and `date` fields. The span is validated
//! once and is immutable afterwards; the display strings are derived on
//! access.
//!
//! # Rules
//!
//! - A `date` overrides `start_date`/`end_date` entirely. It may be a
//!   date, `"present"` or any free-text label.
//! - A `start_date` without `end_date` runs until `"present"`.
//! - An `end_date` without `start_date` is rejected.
//! - `start_date` must not be after `end_date`, and no explicit date may
//!   be in the future.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::date::{self, CanonicalDate, DateError, DateValue, RawDate};
use crate::validation::{
    type_name, Collector, FieldPath, Record, ValidationError, ValidationErrors,
};

/// Field names that make up a span.
pub const SPAN_FIELDS: [&str; 3] = ["start_date", "end_date", "date"];

/// Value of a `date` slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateField {
    /// A parsed date or the present-marker
    Value(DateValue),
    /// Free text shown verbatim (e.g. "Fall 2023")
    Custom(String),
}

impl DateField {
    pub fn display(&self) -> String {
        match self {
            DateField::Value(value) => value.display(),
            DateField::Custom(label) => label.clone(),
        }
    }

    pub fn as_date(&self) -> Option<&DateValue> {
        match self {
            DateField::Value(value) => Some(value),
            DateField::Custom(_) => None,
        }
    }
}

/// Validated timeline of an entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemporalSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<DateField>,
}

impl TemporalSpan {
    /// Read and validate the span fields of a raw entry record.
    pub fn from_record(record: &Record<'_>, today: NaiveDate) -> Result<Self, ValidationErrors> {
        Self::validate(
            record.get("start_date"),
            record.get("end_date"),
            record.get("date"),
            record.path(),
            today,
        )
    }

    /// Validate raw span values found below `path`.
    pub fn validate(
        start: Option<&Value>,
        end: Option<&Value>,
        date: Option<&Value>,
        path: &FieldPath,
        today: NaiveDate,
    ) -> Result<Self, ValidationErrors> {
        if let Some(raw) = date {
            let field = validate_date_field(raw, &path.key("date"), today)?;
            return Ok(Self {
                start: None,
                end: None,
                date: Some(field),
            });
        }

        let (start, end) = match (start, end) {
            (None, None) => return Ok(Self::default()),
            (None, Some(raw_end)) => {
                return Err(ValidationError::range(
                    path.key("end_date"),
                    "\"end_date\" is provided, but \"start_date\" is not; \
                     either provide both or neither",
                )
                .with_input(raw_end.clone())
                .into());
            }
            (Some(start), end) => (start, end),
        };

        let start_path = path.key("start_date");
        let end_path = path.key("end_date");
        let mut collector = Collector::new();

        let start_value = collector.field(parse_bound(start, &start_path, today, false));
        let end_value = match end {
            Some(raw) => collector.field(parse_bound(raw, &end_path, today, true)),
            None => Some(DateValue::Present(today)),
        };

        let (Some(start_value), Some(end_value)) = (start_value, end_value) else {
            return Err(collector.into_errors());
        };

        if start_value.date() > end_value.date() {
            collector.push(
                ValidationError::range(
                    start_path.clone(),
                    "\"start_date\" cannot be after \"end_date\"",
                )
                .with_input(start.clone()),
            );
        } else if start_value.is_future(today) {
            collector.push(
                ValidationError::range(start_path, "\"start_date\" cannot be in the future")
                    .with_input(start.clone()),
            );
        }
        if end_value.is_future(today) {
            let mut error =
                ValidationError::range(end_path, "\"end_date\" cannot be in the future");
            if let Some(raw) = end {
                error = error.with_input(raw.clone());
            }
            collector.push(error);
        }

        tracing::trace!(
            start = %start_value.display(),
            end = %end_value.display(),
            "Validated date range"
        );

        collector.finish(Self {
            start: Some(start_value),
            end: Some(end_value),
            date: None,
        })
    }

    pub fn start(&self) -> Option<&DateValue> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&DateValue> {
        self.end.as_ref()
    }

    pub fn date(&self) -> Option<&DateField> {
        self.date.as_ref()
    }

    /// Whether no date information was given at all.
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.date.is_none()
    }

    /// `"Jan. 2020 to present"`, `"Feb. 2023"`, a custom label, or `""`.
    pub fn date_string(&self) -> String {
        if let Some(date) = &self.date {
            return date.display();
        }
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => format!("{} to {}", start.display(), end.display()),
            _ => String::new(),
        }
    }

    /// Like [`date_string`](Self::date_string), but a range shows years only.
    ///
    /// A single `date` is rendered exactly as in `date_string`.
    pub fn date_string_only_years(&self) -> String {
        if let Some(date) = &self.date {
            return date.display();
        }
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => {
                format!("{} to {}", start.year_display(), end.year_display())
            }
            _ => String::new(),
        }
    }

    /// Length of the range, e.g. `"2 years 3 months"`.
    ///
    /// Empty unless the span is a start/end range. When either bound is a
    /// bare year the result is in whole years. Otherwise a year counts as
    /// 365 days and a month as 30 days, and the month part is never shown
    /// as less than one.
    pub fn time_span_string(&self) -> String {
        if self.date.is_some() {
            return String::new();
        }
        let (Some(start), Some(end)) = (&self.start, &self.end) else {
            return String::new();
        };

        if start.is_year_only() || end.is_year_only() {
            let years = end.date().year() - start.date().year();
            return if years < 2 {
                "1 year".to_string()
            } else {
                format!("{years} years")
            };
        }

        let days = (end.date() - start.date()).num_days();
        let years = days / 365;
        let months = round_half_even(days % 365, 30);

        let months_string = if months <= 1 {
            "1 month".to_string()
        } else {
            format!("{months} months")
        };
        match years {
            0 => months_string,
            1 => format!("1 year {months_string}"),
            n => format!("{n} years {months_string}"),
        }
    }
}

/// Validate the `date` slot of a span.
///
/// Accepts a date, `"present"` or, for text that is not a date, a custom
/// label. Explicit dates must not be in the future.
pub fn validate_date_field(
    raw: &Value,
    path: &FieldPath,
    today: NaiveDate,
) -> Result<DateField, ValidationError> {
    let raw_date = expect_date(raw, path)?;
    match date::parse(&raw_date, today) {
        Ok(value) => {
            reject_future(&value, raw, path, today)?;
            Ok(DateField::Value(value))
        }
        Err(e) => match raw_date {
            RawDate::Text(label) => Ok(DateField::Custom(label)),
            _ => Err(parse_error(e, raw, path)),
        },
    }
}

/// Validate a slot that must hold an explicit date no later than `today`.
pub fn validate_explicit_date(
    raw: &Value,
    path: &FieldPath,
    today: NaiveDate,
) -> Result<CanonicalDate, ValidationError> {
    let raw_date = expect_date(raw, path)?;
    match date::parse(&raw_date, today) {
        Ok(DateValue::Explicit(canonical)) => {
            reject_future(&DateValue::Explicit(canonical), raw, path, today)?;
            Ok(canonical)
        }
        Ok(DateValue::Present(_)) => Err(ValidationError::parse(
            path.clone(),
            "\"present\" is not allowed here; provide a date",
        )
        .with_input(raw.clone())),
        Err(e) => Err(parse_error(e, raw, path)),
    }
}

fn parse_error(error: DateError, raw: &Value, path: &FieldPath) -> ValidationError {
    ValidationError::parse(path.clone(), error.to_string()).with_input(raw.clone())
}

fn expect_date(raw: &Value, path: &FieldPath) -> Result<RawDate, ValidationError> {
    RawDate::from_value(raw).ok_or_else(|| {
        ValidationError::parse(
            path.clone(),
            format!("expected a date, got {}", type_name(raw)),
        )
        .with_input(raw.clone())
    })
}

fn reject_future(
    value: &DateValue,
    raw: &Value,
    path: &FieldPath,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if value.is_future(today) {
        return Err(
            ValidationError::range(path.clone(), "the date cannot be in the future")
                .with_input(raw.clone()),
        );
    }
    Ok(())
}

/// Parse a `start_date` or `end_date` value.
fn parse_bound(
    raw: &Value,
    path: &FieldPath,
    today: NaiveDate,
    allow_present: bool,
) -> Result<DateValue, ValidationError> {
    let raw_date = expect_date(raw, path)?;

    match date::parse(&raw_date, today) {
        Ok(DateValue::Present(_)) if !allow_present => Err(ValidationError::parse(
            path.clone(),
            "\"present\" is only allowed as an end date",
        )
        .with_input(raw.clone())),
        Ok(value) => Ok(value),
        Err(e) => Err(parse_error(e, raw, path)),
    }
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
fn round_half_even(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);
    if twice_remainder > denominator {
        quotient + 1
    } else if twice_remainder == denominator {
        quotient + (quotient & 1)
    } else {
        quotient
    }
}
