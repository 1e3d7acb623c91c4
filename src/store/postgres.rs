use std::time::Duration;

use chrono::NaiveDateTime;
use diesel::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentId, DocumentStore, Filter, StoreError, StoredDocument};
use crate::schema::documents as DocumentsTable;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_DOCUMENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS documents (
    id UUID PRIMARY KEY,
    seq BIGSERIAL NOT NULL,
    collection TEXT NOT NULL,
    body JSONB NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT now()
)";

const CREATE_COLLECTION_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq)";

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = DocumentsTable)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    pub id: Uuid,
    pub seq: i64,
    pub collection: String,
    pub body: Value,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = DocumentsTable)]
pub struct NewDocument {
    pub id: Uuid,
    pub collection: String,
    pub body: Value,
}

/// Document store backed by a single JSONB table in PostgreSQL.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Builds the pool without opening connections up front, so the service
    /// starts even when the database is down; calls fail until it comes back.
    pub fn connect(database_url: &str, max_size: u32, connection_timeout: Duration) -> Self {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(0))
            .connection_timeout(connection_timeout)
            .build_unchecked(manager);
        Self { pool }
    }

    /// Creates the documents table and its index if they are missing.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::sql_query(CREATE_DOCUMENTS_TABLE)
            .execute(&mut conn)
            .map_err(rejected)?;
        diesel::sql_query(CREATE_COLLECTION_INDEX)
            .execute(&mut conn)
            .map_err(rejected)?;
        Ok(())
    }

    /// [`Self::ensure_schema`] on the blocking pool, for use from async code.
    pub async fn prepare(&self) -> Result<(), StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.ensure_schema())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn rejected(err: diesel::result::Error) -> StoreError {
    StoreError::Rejected(err.to_string())
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        match row.body {
            Value::Object(body) => Ok(StoredDocument {
                id: DocumentId::new(row.id.to_string()),
                body,
            }),
            other => Err(StoreError::Malformed(format!(
                "document {} in {} is not an object: {}",
                row.id, row.collection, other
            ))),
        }
    }
}

impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn insert(&self, collection_name: &str, document: Document) -> Result<DocumentId, StoreError> {
        use crate::schema::documents::dsl::id;

        let mut conn = self.conn()?;
        let data = NewDocument {
            id: Uuid::new_v4(),
            collection: collection_name.to_string(),
            body: Value::Object(document),
        };

        let document_id = diesel::insert_into(DocumentsTable::table)
            .values(&data)
            .returning(id)
            .get_result::<Uuid>(&mut conn)
            .map_err(rejected)?;

        Ok(DocumentId::new(document_id.to_string()))
    }

    fn find(
        &self,
        collection_name: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        use crate::schema::documents::dsl::*;

        let mut conn = self.conn()?;
        let max_rows = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut query = documents
            .filter(collection.eq(collection_name))
            .select(DocumentRow::as_select())
            .into_boxed();

        if !filter.is_empty() {
            query = query.filter(body.contains(filter.clone().into_value()));
        }

        let rows = query
            .order(seq.asc())
            .limit(max_rows)
            .load::<DocumentRow>(&mut conn)
            .map_err(rejected)?;

        rows.into_iter().map(StoredDocument::try_from).collect()
    }

    fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .map_err(rejected)?;
        Ok(())
    }

    fn collections(&self) -> Result<Vec<String>, StoreError> {
        use crate::schema::documents::dsl::*;

        let mut conn = self.conn()?;
        documents
            .select(collection)
            .distinct()
            .order(collection.asc())
            .load::<String>(&mut conn)
            .map_err(rejected)
    }
}
