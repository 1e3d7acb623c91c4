use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use super::{Document, DocumentId, DocumentStore, Filter, StoreError, StoredDocument};

/// In-process document store
/// Maps collection name -> documents in insertion order
#[derive(Debug)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(Uuid, Document)>>>,
    reachable: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    /// Toggle reachability; while unreachable every call fails with
    /// `StoreError::Unavailable`.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of documents held in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "in-memory store is marked unreachable".to_string(),
            ))
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn insert(&self, collection: &str, document: Document) -> Result<DocumentId, StoreError> {
        self.check_reachable()?;
        let id = Uuid::new_v4();
        let mut collections = self.collections.write().map_err(poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id, document));
        Ok(DocumentId::new(id.to_string()))
    }

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.check_reachable()?;
        let collections = self.collections.read().map_err(poisoned)?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .filter(|(_, body)| filter.matches(body))
            .take(limit)
            .map(|(id, body)| StoredDocument {
                id: DocumentId::new(id.to_string()),
                body: body.clone(),
            })
            .collect())
    }

    fn ping(&self) -> Result<(), StoreError> {
        self.check_reachable()
    }

    fn collections(&self) -> Result<Vec<String>, StoreError> {
        self.check_reachable()?;
        let collections = self.collections.read().map_err(poisoned)?;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}
