use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use super::validation::{FieldReader, ValidationErrors, parse_date, parse_timestamp};
use super::{Record, RecordKind};
use crate::store::{Document, Filter};

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    #[default]
    Debit,
    Credit,
}

impl ExpenseType {
    pub const ALLOWED: &'static [&'static str] = &["debit", "credit"];

    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseType::Debit => "debit",
            ExpenseType::Credit => "credit",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "debit" => Some(ExpenseType::Debit),
            "credit" => Some(ExpenseType::Credit),
            _ => None,
        }
    }
}

/// When an expense happened: a calendar day, or an exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseDate {
    Day(NaiveDate),
    At(DateTime<Utc>),
}

impl ExpenseDate {
    fn parse(raw: &str) -> Option<Self> {
        parse_date(raw)
            .map(ExpenseDate::Day)
            .or_else(|| parse_timestamp(raw).map(ExpenseDate::At))
    }
}

impl Serialize for ExpenseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExpenseDate::Day(day) => serializer.collect_str(&day.format("%Y-%m-%d")),
            ExpenseDate::At(at) => {
                serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Expense {
    pub amount: f64,
    pub currency: String,
    pub date: Option<ExpenseDate>,
    pub merchant: Option<String>,
    pub note: Option<String>,
    pub category: Option<String>,
    pub account: Option<String>,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
}

impl Record for Expense {
    const KIND: RecordKind = RecordKind::Expense;

    fn from_input(input: &Document) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(input);

        let amount = reader.required_positive("amount");
        let currency = reader.currency_or("currency", DEFAULT_CURRENCY);
        let date = reader.optional_parsed(
            "date",
            "YYYY-MM-DD or an ISO 8601 timestamp",
            ExpenseDate::parse,
        );
        let merchant = reader.optional_text("merchant");
        let note = reader.optional_text("note");
        let category = reader.optional_text("category");
        let account = reader.optional_text("account");
        let expense_type = reader.one_of_or(
            "type",
            ExpenseType::ALLOWED,
            ExpenseType::parse,
            ExpenseType::default(),
        );

        reader.finish()?;

        Ok(Expense {
            amount,
            currency,
            date,
            merchant,
            note,
            category,
            account,
            expense_type,
        })
    }

    fn normalize(mut self, ingested_at: DateTime<Utc>) -> Self {
        if self.date.is_none() {
            self.date = Some(ExpenseDate::At(ingested_at));
        }
        self
    }
}

/// Expense listings only ever show debits.
pub fn list_filter(category: Option<&str>) -> Filter {
    Filter::new()
        .eq("type", ExpenseType::Debit.as_str())
        .eq_non_empty("category", category)
}
