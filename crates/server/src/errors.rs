use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use service::form_service::SubmitError;
use service::forms::FormErrors;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{ "error", "detail"?, "errors"? }`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Structured validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail, errors: None }
    }

    pub fn invalid<T: Serialize>(errors: &T) -> Self {
        let mut err = Self::new(StatusCode::BAD_REQUEST, "Validation Error", None);
        err.errors = serde_json::to_value(errors).ok();
        err
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(&self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            _ => {
                error!(err = %e, "request failed");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
            }
        }
    }
}

impl From<SubmitError> for JsonApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Invalid(errors) => JsonApiError::invalid(&errors),
            SubmitError::Service(e) => e.into(),
        }
    }
}

impl From<FormErrors> for JsonApiError {
    fn from(errors: FormErrors) -> Self { JsonApiError::invalid(&errors) }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}
