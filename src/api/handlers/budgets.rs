use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    api::{
        error::ApiError,
        extractors::{ApiQuery, RecordBody},
        response::{CreatedResponse, ListResponse},
    },
    records::{
        Budget, RecordKind, budget,
        operations::{create_record, list_records, resolve_limit},
    },
    utils::app_config::AppConfig,
};

#[derive(Debug, Deserialize)]
pub struct BudgetListParams {
    pub month: Option<String>,
    pub limit: Option<i64>,
}

/// POST /api/budgets
pub async fn create_budget(
    State(app_config): State<AppConfig>,
    RecordBody(input): RecordBody,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = create_record::<Budget>(&app_config.store, &input).await?;
    Ok((StatusCode::OK, Json(CreatedResponse::new(id))))
}

/// GET /api/budgets
pub async fn list_budgets(
    State(app_config): State<AppConfig>,
    ApiQuery(params): ApiQuery<BudgetListParams>,
) -> Result<(StatusCode, Json<ListResponse>), ApiError> {
    let limit = resolve_limit(RecordKind::Budget, params.limit)?;
    let filter = budget::list_filter(params.month.as_deref());

    let items = list_records(&app_config.store, RecordKind::Budget, filter, limit).await?;
    Ok((StatusCode::OK, Json(ListResponse::new(items))))
}
