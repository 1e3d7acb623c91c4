use serde::Serialize;

use crate::records::FieldError;
use crate::store::{Document, DocumentId};

/// Body of a successful create: `{"ok": true, "id": "..."}`
#[derive(Serialize, Debug)]
pub struct CreatedResponse {
    pub ok: bool,
    pub id: DocumentId,
}

impl CreatedResponse {
    pub fn new(id: DocumentId) -> Self {
        Self { ok: true, id }
    }
}

/// Body of a successful list: `{"ok": true, "items": [...]}`
#[derive(Serialize, Debug)]
pub struct ListResponse {
    pub ok: bool,
    pub items: Vec<Document>,
}

impl ListResponse {
    pub fn new(items: Vec<Document>) -> Self {
        Self { ok: true, items }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<Vec<FieldError>>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            details,
        }
    }
}
