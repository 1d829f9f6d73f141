use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use lostfound_blob::store_upload;
use lostfound_core::{ApiResponse, UploadRejected};

use super::AppState;
use super::schemas::{ErrorResponse, UploadForm, UploadResponse};
use crate::error::ApiError;

/// Multipart field that carries the image.
pub const UPLOAD_FIELD: &str = "image";

/// `POST /upload` -- store an item image.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Uploads",
    summary = "Upload an image",
    description = "Accepts a single image in the `image` multipart field, stores it under a generated name and returns its public URL.",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file, or file rejected by the upload policy", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::bad_request("No file uploaded"));
    };

    let (original_name, content_type, data) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| read_error(&state, e.status(), e.body_text()))?;
        let Some(field) = field else {
            return Err(ApiError::bad_request("No file uploaded"));
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let data = field
            .bytes()
            .await
            .map_err(|e| read_error(&state, e.status(), e.body_text()))?;
        break (original_name, content_type, data);
    };

    let file = store_upload(
        state.blobs.as_ref(),
        &state.policy,
        &original_name,
        &content_type,
        data,
    )
    .await?;

    Ok(Json(ApiResponse::ok("File uploaded successfully", file)))
}

/// A body that hits the transport limit is reported like any other
/// oversized file.
fn read_error(state: &AppState, status: StatusCode, detail: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        let rejected = UploadRejected::TooLarge {
            size: state.policy.max_bytes.saturating_add(1),
            limit: state.policy.max_bytes,
        };
        return ApiError::bad_request(rejected.to_string());
    }
    warn!(error = %detail, "malformed multipart upload");
    ApiError::bad_request("No file uploaded").with_errors(vec![detail])
}
