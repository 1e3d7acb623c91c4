pub mod budgets;
pub mod expenses;
pub mod goals;
pub mod health;

use crate::api::error::ApiError;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route")
}
