#![allow(clippy::needless_for_each)]

use lostfound_core::{Coordinates, Item, ItemDraft, ItemPatch, ItemType, Pagination, UploadedFile};

use super::schemas::{
    DeletedResponse, ErrorResponse, HealthData, HealthResponse, ItemListResponse, ItemResponse,
    UploadForm, UploadResponse,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Lost & Found API",
        version = "0.1.0",
        description = "HTTP API for reporting, browsing and managing lost and found items. Every route under `/items` and `/upload` is also served under `/api`.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Items", description = "Lost and found item reports"),
        (name = "Uploads", description = "Item image upload and retrieval")
    ),
    paths(
        super::health::health,
        super::items::create_item,
        super::items::list_items,
        super::items::get_item,
        super::items::update_item,
        super::items::delete_item,
        super::upload::upload_image,
        super::uploads::get_upload,
    ),
    components(schemas(
        Item,
        ItemType,
        Coordinates,
        ItemDraft,
        ItemPatch,
        Pagination,
        UploadedFile,
        HealthData,
        HealthResponse,
        ItemResponse,
        ItemListResponse,
        DeletedResponse,
        UploadResponse,
        UploadForm,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;
