pub mod budget;
pub mod expense;
pub mod goal;
pub mod operations;
pub mod validation;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::store::Document;

pub use budget::Budget;
pub use expense::{Expense, ExpenseType};
pub use goal::Goal;
pub use validation::{Constraint, FieldError, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Expense,
    Budget,
    Goal,
}

impl RecordKind {
    /// Fixed collection each kind is stored in.
    pub fn collection(self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::Budget => "budget",
            RecordKind::Goal => "goal",
        }
    }

    /// Inclusive upper bound for a list request's `limit`.
    pub fn max_list_limit(self) -> usize {
        match self {
            RecordKind::Expense => 500,
            RecordKind::Budget | RecordKind::Goal => 200,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

pub const DEFAULT_LIST_LIMIT: usize = 50;

/// A record kind with its schema: validation from a loose mapping,
/// normalization at ingestion, and the document it is stored as.
pub trait Record: Serialize + Sized {
    const KIND: RecordKind;

    fn from_input(input: &Document) -> Result<Self, ValidationErrors>;

    /// Fills ingestion-time defaults.
    fn normalize(self, _ingested_at: DateTime<Utc>) -> Self {
        self
    }

    fn to_document(&self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(document) => Ok(document),
            other => Err(serde::ser::Error::custom(format!(
                "{} did not serialize to an object: {}",
                Self::KIND,
                other
            ))),
        }
    }
}
