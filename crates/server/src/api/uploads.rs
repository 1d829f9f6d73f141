use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::error;

use lostfound_core::is_safe_file_name;

use super::AppState;
use crate::error::ApiError;

/// `GET /uploads/{name}` -- serve a stored image.
#[utoipa::path(
    get,
    path = "/uploads/{name}",
    tag = "Uploads",
    summary = "Fetch an uploaded image",
    params(("name" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 404, description = "No such file"),
    )
)]
pub async fn get_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    if !is_safe_file_name(&name) {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "File not found"));
    }

    let stored = state.blobs.get(&name).await.map_err(|e| {
        error!(name = %name, error = %e, "failed to read upload");
        ApiError::internal("Failed to read file from storage").with_errors(vec![e.to_string()])
    })?;

    match stored {
        // Stored files come from clients; scripts inside them (SVG) must
        // never run on this origin.
        Some((blob, data)) => Ok((
            [
                (header::CONTENT_TYPE, blob.content_type),
                (header::CACHE_CONTROL, "public, max-age=3600".to_owned()),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_owned()),
                (
                    header::CONTENT_SECURITY_POLICY,
                    "default-src 'none'; sandbox".to_owned(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{name}\""),
                ),
            ],
            data,
        )
            .into_response()),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "File not found")),
    }
}
