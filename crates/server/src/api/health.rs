use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;

use lostfound_core::ApiResponse;

use super::AppState;
use super::schemas::{HealthData, HealthResponse};

/// `GET /health` -- liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Returns the server time and the deployment environment.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(
        "Lost & Found API is running",
        HealthData {
            timestamp: Utc::now(),
            environment: state.environment.to_string(),
        },
    ))
}
