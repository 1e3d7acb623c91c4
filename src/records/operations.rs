use std::sync::Arc;

use chrono::Utc;

use super::{Constraint, Record, RecordKind, ValidationErrors};
use crate::store::{Document, DocumentId, DocumentStore, Filter, StoreError, StoredDocument};

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Runs a blocking store call on tokio's blocking pool.
async fn with_store<T, F>(store: &Arc<dyn DocumentStore>, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn DocumentStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::Unavailable(format!("store task failed: {}", e)))?
}

/// Checks a requested list size against the kind's bounds.
/// Out-of-range values are rejected, never clamped.
pub fn resolve_limit(kind: RecordKind, requested: Option<i64>) -> Result<usize, ValidationErrors> {
    let max = kind.max_list_limit();
    let out_of_range = || {
        ValidationErrors::single(
            "limit",
            Constraint::OutOfRange {
                min: 1,
                max: max as i64,
            },
        )
    };

    match requested {
        None => Ok(super::DEFAULT_LIST_LIMIT),
        Some(n) => match usize::try_from(n) {
            Ok(n) if (1..=max).contains(&n) => Ok(n),
            _ => Err(out_of_range()),
        },
    }
}

/// Validates `input` as an `R`, stamps ingestion defaults and stores it in
/// the kind's collection.
pub async fn create_record<R: Record>(
    store: &Arc<dyn DocumentStore>,
    input: &Document,
) -> Result<DocumentId, OperationError> {
    let kind = R::KIND;
    let record = R::from_input(input)
        .inspect_err(|e| tracing::debug!(kind = %kind, error = %e, "rejected input"))?
        .normalize(Utc::now());
    let document = record.to_document()?;

    let collection = kind.collection();
    let id = with_store(store, move |s| s.insert(collection, document)).await?;

    tracing::info!(kind = %kind, id = %id, "record created");
    Ok(id)
}

/// Returns matching documents of `kind` in insertion order, each carrying
/// its identifier under `_id`.
pub async fn list_records(
    store: &Arc<dyn DocumentStore>,
    kind: RecordKind,
    filter: Filter,
    limit: usize,
) -> Result<Vec<Document>, OperationError> {
    let collection = kind.collection();
    let found = with_store(store, move |s| s.find(collection, &filter, limit)).await?;

    tracing::debug!(kind = %kind, count = found.len(), limit, "records listed");
    Ok(found.into_iter().map(StoredDocument::into_document).collect())
}
