use serde::Serialize;

use super::validation::{FieldReader, ValidationErrors, parse_month};
use super::{Record, RecordKind};
use crate::store::{Document, Filter};

/// Spending limit for a category, optionally scoped to one month.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Budget {
    pub category: String,
    pub amount: f64,
    /// `YYYY-MM`; unset means the budget is not tied to a month.
    pub month: Option<String>,
}

impl Record for Budget {
    const KIND: RecordKind = RecordKind::Budget;

    fn from_input(input: &Document) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(input);

        let category = reader.required_text("category");
        let amount = reader.required_positive("amount");
        let month = reader.optional_parsed("month", "YYYY-MM", parse_month);

        reader.finish()?;

        Ok(Budget {
            category,
            amount,
            month,
        })
    }
}

pub fn list_filter(month: Option<&str>) -> Filter {
    Filter::new().eq_non_empty("month", month)
}
