pub mod memory;
pub mod postgres;

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// A document as it travels between the records layer and a store.
pub type Document = Map<String, Value>;

/// Store-assigned identifier, exposed only as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document read back from a collection together with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub body: Document,
}

impl StoredDocument {
    /// Flattens the identifier into the body under `_id`.
    pub fn into_document(self) -> Document {
        let mut body = self.body;
        body.insert("_id".to_string(), Value::String(self.id.into_string()));
        body
    }
}

/// Exact-match filter: every field must equal its value (logical AND).
///
/// An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Adds the condition only when `value` is present and non-empty.
    pub fn eq_non_empty(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.eq(field, v),
            _ => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document store rejected the operation: {0}")]
    Rejected(String),
    #[error("unexpected document shape: {0}")]
    Malformed(String),
}

/// Storage-agnostic create and query primitives shared by every record kind.
///
/// Implementations are blocking; async callers go through
/// `tokio::task::spawn_blocking`. `find` returns documents in insertion order.
pub trait DocumentStore: Send + Sync {
    /// Short name of the backing implementation, e.g. `"postgres"`.
    fn backend(&self) -> &'static str;

    fn insert(&self, collection: &str, document: Document) -> Result<DocumentId, StoreError>;

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    fn ping(&self) -> Result<(), StoreError>;

    /// Names of collections holding at least one document, sorted.
    fn collections(&self) -> Result<Vec<String>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&doc(json!({"a": 1}))));
        assert!(filter.matches(&Document::new()));
    }

    #[test]
    fn test_filter_requires_every_field() {
        let filter = Filter::new().eq("type", "debit").eq("category", "food");

        assert!(filter.matches(&doc(json!({"type": "debit", "category": "food", "amount": 3}))));
        assert!(!filter.matches(&doc(json!({"type": "debit", "category": "travel"}))));
        assert!(!filter.matches(&doc(json!({"type": "debit"}))));
    }

    #[test]
    fn test_eq_non_empty_skips_blank_values() {
        let filter = Filter::new()
            .eq_non_empty("category", Some(""))
            .eq_non_empty("month", None);
        assert!(filter.is_empty());

        let filter = Filter::new().eq_non_empty("month", Some("2025-01"));
        assert_eq!(filter.get("month"), Some(&json!("2025-01")));
    }

    #[test]
    fn test_stored_document_exposes_string_id() {
        let stored = StoredDocument {
            id: DocumentId::new("abc"),
            body: doc(json!({"name": "car"})),
        };
        let flat = stored.into_document();
        assert_eq!(flat.get("_id"), Some(&json!("abc")));
        assert_eq!(flat.get("name"), Some(&json!("car")));
    }
}
