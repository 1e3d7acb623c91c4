use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::store::Document;

/// The rule a field broke.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Constraint {
    Missing,
    WrongType { expected: &'static str },
    Blank,
    NotPositive,
    Negative,
    OutOfRange { min: i64, max: i64 },
    Length { expected: usize },
    OneOf { allowed: &'static [&'static str] },
    Format { expected: &'static str },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Missing => f.write_str("field is required"),
            Constraint::WrongType { expected } => write!(f, "expected {}", expected),
            Constraint::Blank => f.write_str("cannot be empty"),
            Constraint::NotPositive => f.write_str("must be greater than 0"),
            Constraint::Negative => f.write_str("must be greater than or equal to 0"),
            Constraint::OutOfRange { min, max } => {
                write!(f, "must be between {} and {}", min, max)
            }
            Constraint::Length { expected } => {
                write!(f, "must be exactly {} characters", expected)
            }
            Constraint::OneOf { allowed } => write!(f, "must be one of: {}", allowed.join(", ")),
            Constraint::Format { expected } => write!(f, "must match format {}", expected),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    #[serde(flatten)]
    pub constraint: Constraint,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, constraint: Constraint) -> Self {
        let message = constraint.to_string();
        Self {
            field,
            constraint,
            message,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field-level failure found in one input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("validation failed: {}", summary(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(field: &'static str, constraint: Constraint) -> Self {
        Self {
            errors: vec![FieldError::new(field, constraint)],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Reads typed fields out of a loosely-typed input, collecting every
/// violation instead of stopping at the first one.
///
/// Accessors for required fields return a placeholder when the field is bad;
/// callers must go through `finish` before using any value.
pub(crate) struct FieldReader<'a> {
    input: &'a Document,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(input: &'a Document) -> Self {
        Self {
            input,
            errors: Vec::new(),
        }
    }

    fn reject(&mut self, field: &'static str, constraint: Constraint) {
        self.errors.push(FieldError::new(field, constraint));
    }

    /// `None` for an absent or null field.
    fn present(&self, field: &str) -> Option<&'a Value> {
        match self.input.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn number(&mut self, field: &'static str) -> Option<f64> {
        let value = self.present(field)?;
        match value.as_f64() {
            Some(n) if value.is_number() => Some(n),
            _ => {
                self.reject(field, Constraint::WrongType { expected: "a number" });
                None
            }
        }
    }

    fn text(&mut self, field: &'static str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.reject(field, Constraint::WrongType { expected: "a string" });
                None
            }
        }
    }

    pub(crate) fn required_positive(&mut self, field: &'static str) -> f64 {
        if self.present(field).is_none() {
            self.reject(field, Constraint::Missing);
            return 0.0;
        }
        match self.number(field) {
            Some(n) if n > 0.0 => n,
            Some(_) => {
                self.reject(field, Constraint::NotPositive);
                0.0
            }
            None => 0.0,
        }
    }

    pub(crate) fn non_negative_or(&mut self, field: &'static str, default: f64) -> f64 {
        match self.number(field) {
            Some(n) if n >= 0.0 => n,
            Some(_) => {
                self.reject(field, Constraint::Negative);
                default
            }
            None => default,
        }
    }

    pub(crate) fn required_text(&mut self, field: &'static str) -> String {
        if self.present(field).is_none() {
            self.reject(field, Constraint::Missing);
            return String::new();
        }
        match self.text(field) {
            Some(s) if !s.trim().is_empty() => s,
            Some(_) => {
                self.reject(field, Constraint::Blank);
                String::new()
            }
            None => String::new(),
        }
    }

    pub(crate) fn optional_text(&mut self, field: &'static str) -> Option<String> {
        self.text(field)
    }

    /// Three ASCII letters, kept as sent.
    pub(crate) fn currency_or(&mut self, field: &'static str, default: &str) -> String {
        let Some(code) = self.text(field) else {
            return default.to_string();
        };
        if code.chars().count() != 3 {
            self.reject(field, Constraint::Length { expected: 3 });
            return default.to_string();
        }
        if !code.chars().all(|c| c.is_ascii_alphabetic()) {
            self.reject(field, Constraint::Format { expected: "three letters" });
            return default.to_string();
        }
        code
    }

    pub(crate) fn one_of_or<T: Copy>(
        &mut self,
        field: &'static str,
        allowed: &'static [&'static str],
        parse: impl Fn(&str) -> Option<T>,
        default: T,
    ) -> T {
        let Some(raw) = self.text(field) else {
            return default;
        };
        match parse(&raw) {
            Some(v) => v,
            None => {
                self.reject(field, Constraint::OneOf { allowed });
                default
            }
        }
    }

    pub(crate) fn optional_parsed<T>(
        &mut self,
        field: &'static str,
        expected: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = self.text(field)?;
        let parsed = parse(raw.trim());
        if parsed.is_none() {
            self.reject(field, Constraint::Format { expected });
        }
        parsed
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM` with a month between 01 and 12.
pub fn parse_month(raw: &str) -> Option<String> {
    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.chars().all(|c| c.is_ascii_digit()) || !month.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let month_number: u32 = month.parse().ok()?;
    (1..=12).contains(&month_number).then(|| raw.to_string())
}
