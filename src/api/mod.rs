pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;

#[cfg(test)]
mod tests;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::utils::app_config::AppConfig;
use handlers::{budgets::*, expenses::*, goals::*, health};

/// Every route the service exposes, bound to `app_config`
pub fn router(app_config: AppConfig) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/test", get(health::diagnostics))
        .route("/health", get(health::diagnostics))
        // Expenses
        .route("/api/expenses", get(list_expenses).post(create_expense))
        // Budgets
        .route("/api/budgets", get(list_budgets).post(create_budget))
        // Goals
        .route("/api/goals", get(list_goals).post(create_goal))
        .fallback(handlers::not_found)
        .with_state(app_config)
}

/// The router wrapped in request tracing and permissive CORS, as served
pub fn service(app_config: AppConfig) -> Router {
    router(app_config).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
