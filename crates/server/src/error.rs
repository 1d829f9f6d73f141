use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use lostfound_blob::BlobError;
use lostfound_core::ApiResponse;
use lostfound_service::ServiceError;

/// Errors that can occur when running the Lost & Found server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        error!(error = %message, "server error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::failure(message)),
        )
            .into_response()
    }
}

/// An HTTP error answered with the standard response envelope.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Item not found")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Map a service failure, using `fallback` as the message for storage
    /// failures.
    pub fn from_service(err: ServiceError, fallback: &str) -> Self {
        match err {
            ServiceError::Validation(errors) => {
                Self::bad_request("Validation error").with_errors(errors.into_messages())
            }
            ServiceError::NotFound(_) => Self::not_found(),
            ServiceError::Storage(e) => {
                error!(error = %e, "item store failure");
                Self::internal(fallback).with_errors(vec![e.to_string()])
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::from_service(err, "Internal server error")
    }
}

impl From<BlobError> for ApiError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::Rejected(rejected) => Self::bad_request(rejected.to_string()),
            BlobError::InvalidName(name) => Self::bad_request(format!("Invalid file name: {name}")),
            BlobError::Storage(e) => {
                error!(error = %e, "object store failure");
                Self::internal("Failed to upload file to storage").with_errors(vec![e])
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = ApiResponse::<()>::failure(self.message);
        if let Some(errors) = self.errors {
            body = body.with_errors(errors);
        }
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use lostfound_core::{UploadRejected, ValidationErrors};
    use lostfound_store::StoreError;

    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_details() {
        let err = ApiError::from(ServiceError::Validation(ValidationErrors::single(
            "\"name\" is required",
        )));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Validation error");
        assert_eq!(err.errors, Some(vec!["\"name\" is required".to_owned()]));
    }

    #[test]
    fn not_found_and_storage() {
        let err = ApiError::from(ServiceError::NotFound("42".into()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Item not found");

        let err = ApiError::from_service(
            ServiceError::Storage(StoreError::Storage("disk full".into())),
            "Failed to create item",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to create item");
    }

    #[test]
    fn blob_errors() {
        let err = ApiError::from(BlobError::Rejected(UploadRejected::NotAnImage(
            "text/plain".into(),
        )));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Please select an image file");

        let err = ApiError::from(BlobError::Storage("bucket gone".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to upload file to storage");
    }
}
