use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response::ErrorResponse;
use crate::records::{FieldError, ValidationErrors, operations::OperationError};
use crate::store::StoreError;

/// Storage failures reach clients with at most this many characters.
pub const MAX_ERROR_DETAIL_CHARS: usize = 200;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Validation(ValidationErrors),
    NotFound(String),
    InternalError(String),
    DatabaseError(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::DatabaseError(truncate(msg.into(), MAX_ERROR_DETAIL_CHARS))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Validation(errors) => errors.to_string(),
            ApiError::NotFound(msg) => format!("{} not found", msg),
            ApiError::InternalError(msg) => msg.clone(),
            ApiError::DatabaseError(msg) => msg.clone(),
        }
    }

    fn details(self) -> Option<Vec<FieldError>> {
        match self {
            ApiError::Validation(errors) => Some(errors.into_errors()),
            _ => None,
        }
    }
}

fn truncate(msg: String, max_chars: usize) -> String {
    match msg.char_indices().nth(max_chars) {
        Some((cut, _)) => msg[..cut].to_string(),
        None => msg,
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::database_error(err.to_string())
    }
}

impl From<OperationError> for ApiError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::Validation(errors) => errors.into(),
            OperationError::Store(err) => err.into(),
            OperationError::Encode(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "request failed");
        } else {
            tracing::debug!(status = %status, error = %message, "request rejected");
        }

        let error_response = ErrorResponse::new(message, self.details());
        (status, Json(error_response)).into_response()
    }
}
