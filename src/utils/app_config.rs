use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

pub const DEFAULT_DATABASE_NAME: &str = "coinflow";
const DEFAULT_POOL_SIZE: u32 = 10;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppConfig {
    pub store: Arc<dyn DocumentStore>,
    pub database_name: String,
    /// Whether `DATABASE_URL` was provided
    pub database_url_set: bool,
    /// Whether `DATABASE_NAME` was provided
    pub database_name_set: bool,
}

impl AppConfig {
    pub fn new(store: Arc<dyn DocumentStore>, database_name: impl Into<String>) -> Self {
        Self {
            store,
            database_name: database_name.into(),
            database_url_set: false,
            database_name_set: false,
        }
    }

    /// Config over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryDocumentStore::new()), DEFAULT_DATABASE_NAME)
    }

    /// Reads `DATABASE_URL`, `DATABASE_NAME` and `DATABASE_POOL_SIZE` from the
    /// environment; `.env` is expected to be loaded by the caller.
    ///
    /// Without a database URL the service runs on the in-memory store.
    pub async fn from_env() -> Result<Self> {
        let database_name_env = std::env::var("DATABASE_NAME").ok();
        let database_name_set = database_name_env.is_some();
        let database_name =
            database_name_env.unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            tracing::warn!("DATABASE_URL not set, records will only be kept in memory");
            let mut config = Self::new(Arc::new(MemoryDocumentStore::new()), database_name);
            config.database_name_set = database_name_set;
            return Ok(config);
        };

        let pool_size = match std::env::var("DATABASE_POOL_SIZE") {
            Ok(raw) => raw
                .parse::<u32>()
                .context("DATABASE_POOL_SIZE must be a positive integer")?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        let store = PgDocumentStore::connect(&database_url, pool_size, CONNECTION_TIMEOUT);
        if let Err(e) = store.prepare().await {
            tracing::warn!(error = %e, "could not prepare documents table, continuing");
        }

        Ok(Self {
            store: Arc::new(store),
            database_name,
            database_url_set: true,
            database_name_set,
        })
    }
}
