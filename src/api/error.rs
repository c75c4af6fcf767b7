use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::Rejection;

/// Body of every non-2xx response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            detail: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body, missing fields or a broken field rule
    #[error("{0}")]
    Validation(String),
    /// Request classified as invalid
    #[error("{}", .0.message())]
    Rejected(Rejection),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected(rejection) => StatusCode::from_u16(rejection.status_code())
                .unwrap_or(StatusCode::FORBIDDEN),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::model::RequestValidationError> for ApiError {
    fn from(err: crate::model::RequestValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            log::error!("Request failed: {:#}", err);
        }
        let status = self.status_code();
        (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
    }
}
