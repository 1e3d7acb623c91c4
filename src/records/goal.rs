use chrono::NaiveDate;
use serde::Serialize;

use super::validation::{FieldReader, ValidationErrors, parse_date};
use super::{Record, RecordKind};
use crate::store::{Document, Filter};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Goal {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
}

impl Record for Goal {
    const KIND: RecordKind = RecordKind::Goal;

    fn from_input(input: &Document) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(input);

        let name = reader.required_text("name");
        let target_amount = reader.required_positive("target_amount");
        let current_amount = reader.non_negative_or("current_amount", 0.0);
        let deadline = reader.optional_parsed("deadline", "YYYY-MM-DD", parse_date);

        reader.finish()?;

        Ok(Goal {
            name,
            target_amount,
            current_amount,
            deadline,
        })
    }
}

pub fn list_filter() -> Filter {
    Filter::new()
}
