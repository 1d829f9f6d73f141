pub mod health;
pub mod items;
pub mod openapi;
pub mod schemas;
pub mod upload;
pub mod uploads;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use lostfound_blob::BlobStore;
use lostfound_core::UploadPolicy;
use lostfound_service::ItemService;

use self::openapi::ApiDoc;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Validating front of the item store.
    pub service: ItemService,
    /// Object store for uploaded images.
    pub blobs: Arc<dyn BlobStore>,
    /// Size and type limits for uploads.
    pub policy: UploadPolicy,
    /// Deployment name reported by the health check.
    pub environment: Arc<str>,
}

/// Item and upload routes, mounted both at the root and under `/api`.
fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/items/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/upload", post(upload::upload_image))
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .policy
        .max_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(health::health))
        .route("/uploads/{name}", get(uploads::get_upload))
        .merge(item_routes())
        .nest("/api", item_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
