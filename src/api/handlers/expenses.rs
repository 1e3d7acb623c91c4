use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    api::{
        error::ApiError,
        extractors::{ApiQuery, RecordBody},
        response::{CreatedResponse, ListResponse},
    },
    records::{
        Expense, RecordKind, expense,
        operations::{create_record, list_records, resolve_limit},
    },
    utils::app_config::AppConfig,
};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseListParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

/// POST /api/expenses
pub async fn create_expense(
    State(app_config): State<AppConfig>,
    RecordBody(input): RecordBody,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = create_record::<Expense>(&app_config.store, &input).await?;
    Ok((StatusCode::OK, Json(CreatedResponse::new(id))))
}

/// GET /api/expenses - debit expenses, optionally narrowed to one category
pub async fn list_expenses(
    State(app_config): State<AppConfig>,
    ApiQuery(params): ApiQuery<ExpenseListParams>,
) -> Result<(StatusCode, Json<ListResponse>), ApiError> {
    let limit = resolve_limit(RecordKind::Expense, params.limit)?;
    let filter = expense::list_filter(params.category.as_deref());

    let items = list_records(&app_config.store, RecordKind::Expense, filter, limit).await?;
    Ok((StatusCode::OK, Json(ListResponse::new(items))))
}
