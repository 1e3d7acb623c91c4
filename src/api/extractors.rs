use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::store::Document;

/// JSON body kept as a loose field mapping, ready for schema validation
pub struct RecordBody(pub Document);

#[async_trait]
impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to parse JSON: {}", e)))?;

        match value {
            Value::Object(fields) => Ok(RecordBody(fields)),
            _ => Err(ApiError::bad_request("Request body must be a JSON object")),
        }
    }
}

/// `Query` whose rejection is reported as an `ApiError`
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid query parameters: {}", e)))?;
        Ok(ApiQuery(params))
    }
}
