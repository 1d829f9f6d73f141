//! Documentation-only shapes of the response envelope.
//!
//! Handlers answer with [`lostfound_core::ApiResponse`]; these concrete
//! types describe each instantiation of it for the OpenAPI document.

use chrono::{DateTime, Utc};
use lostfound_core::{Item, Pagination, UploadedFile};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthData {
    /// Server time of the check.
    pub timestamp: DateTime<Utc>,
    /// Deployment name.
    #[schema(example = "development")]
    pub environment: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Lost & Found API is running")]
    pub message: String,
    pub data: HealthData,
}

/// A single item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Item retrieved successfully")]
    pub message: String,
    pub data: Item,
}

/// One page of items.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemListResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Items retrieved successfully")]
    pub message: String,
    pub data: Vec<Item>,
    pub pagination: Pagination,
}

/// Success with no payload (`data` is `null`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Item deleted successfully")]
    pub message: String,
    #[schema(value_type = Option<Object>, example = json!(null))]
    pub data: Option<serde_json::Value>,
}

/// Metadata of a stored upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "File uploaded successfully")]
    pub message: String,
    pub data: UploadedFile,
}

/// Multipart form accepted by `POST /upload`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// The image file.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Validation error")]
    pub message: String,
    #[schema(value_type = Option<Object>, example = json!(null))]
    pub data: Option<serde_json::Value>,
    /// Field-level messages, present for validation failures.
    #[schema(example = json!(["\"name\" is required"]))]
    pub errors: Option<Vec<String>>,
}
