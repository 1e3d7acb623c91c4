use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};

use crate::store::StoreError;
use crate::utils::app_config::AppConfig;

const MAX_LISTED_COLLECTIONS: usize = 10;
const MAX_STATUS_ERROR_CHARS: usize = 50;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Coinflow Backend is running" }))
}

#[derive(Serialize, Debug)]
pub struct StoreDiagnostics {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_or_not(set: bool) -> String {
    if set { "✅ Set" } else { "❌ Not Set" }.to_string()
}

fn short(err: impl ToString) -> String {
    err.to_string().chars().take(MAX_STATUS_ERROR_CHARS).collect()
}

/// GET /test (also served at /health) - store diagnostics; always answers 200
pub async fn diagnostics(State(app_config): State<AppConfig>) -> Json<StoreDiagnostics> {
    let store = app_config.store.clone();

    // outer error: store unreachable; inner error: listing collections failed
    let outcome = tokio::task::spawn_blocking(move || -> Result<Result<Vec<String>, StoreError>, StoreError> {
        store.ping()?;
        Ok(store.collections())
    })
    .await;

    let (database, connection_status, collections) = match outcome {
        Ok(Ok(Ok(mut names))) => {
            names.truncate(MAX_LISTED_COLLECTIONS);
            ("✅ Connected & Working".to_string(), "Connected", names)
        }
        Ok(Ok(Err(e))) => (
            format!("⚠️  Connected but Error: {}", short(e)),
            "Connected",
            Vec::new(),
        ),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "store diagnostics failed");
            (format!("❌ Error: {}", short(e)), "Not Connected", Vec::new())
        }
        Err(e) => (format!("❌ Error: {}", short(e)), "Not Connected", Vec::new()),
    };

    Json(StoreDiagnostics {
        backend: "✅ Running".to_string(),
        database,
        database_url: set_or_not(app_config.database_url_set),
        database_name: set_or_not(app_config.database_name_set),
        connection_status: connection_status.to_string(),
        collections,
    })
}
