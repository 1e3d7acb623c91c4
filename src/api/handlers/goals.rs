use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    api::{
        error::ApiError,
        extractors::{ApiQuery, RecordBody},
        response::{CreatedResponse, ListResponse},
    },
    records::{
        Goal, RecordKind, goal,
        operations::{create_record, list_records, resolve_limit},
    },
    utils::app_config::AppConfig,
};

#[derive(Debug, Deserialize)]
pub struct GoalListParams {
    pub limit: Option<i64>,
}

/// POST /api/goals
pub async fn create_goal(
    State(app_config): State<AppConfig>,
    RecordBody(input): RecordBody,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = create_record::<Goal>(&app_config.store, &input).await?;
    Ok((StatusCode::OK, Json(CreatedResponse::new(id))))
}

/// GET /api/goals
pub async fn list_goals(
    State(app_config): State<AppConfig>,
    ApiQuery(params): ApiQuery<GoalListParams>,
) -> Result<(StatusCode, Json<ListResponse>), ApiError> {
    let limit = resolve_limit(RecordKind::Goal, params.limit)?;

    let items = list_records(&app_config.store, RecordKind::Goal, goal::list_filter(), limit).await?;
    Ok((StatusCode::OK, Json(ListResponse::new(items))))
}
