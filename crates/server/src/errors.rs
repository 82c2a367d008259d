use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorResponse;
use models::errors::ModelError;
use service::enrich::EnrichError;
use service::errors::StoreError;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by every contact handler, rendered as `{"error":{"message":...}}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<StoreError> for JsonApiError {
    fn from(e: StoreError) -> Self {
        let status = match &e {
            StoreError::NotFound(_)
            | StoreError::AlreadyFavorite(_)
            | StoreError::AlreadyNotFavorite(_)
            | StoreError::WrongActionFormat(_)
            | StoreError::FilterWrongFormat(_) => StatusCode::BAD_REQUEST,
            StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
            StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if e.is_internal() {
            error!(error = %e, "storage failure");
        } else {
            warn!(error = %e, "storage rejected request");
        }
        Self::new(status, e.to_string())
    }
}

impl From<ModelError> for JsonApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::bad_request(msg),
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "malformed request body");
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<EnrichError> for JsonApiError {
    fn from(e: EnrichError) -> Self {
        error!(error = %e, "name enrichment failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
