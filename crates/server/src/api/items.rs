use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use lostfound_core::{ApiResponse, ItemDraft, ItemPatch, ListParams};

use super::AppState;
use super::schemas::{DeletedResponse, ErrorResponse, ItemListResponse, ItemResponse};
use crate::error::ApiError;

/// Unwrap a JSON body, answering malformed bodies like any other invalid
/// payload.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            Err(ApiError::bad_request("Validation error").with_errors(vec![rejection.body_text()]))
        }
    }
}

/// `POST /items` -- report a lost or found item.
#[utoipa::path(
    post,
    path = "/items",
    tag = "Items",
    summary = "Create an item",
    description = "Validates and sanitizes the payload, stamps `date_reported` with the current time and stores the item. Client-supplied `id` and `date_reported` are ignored.",
    request_body(content = ItemDraft, description = "Item to report"),
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(body)?;
    let item = state
        .service
        .create(&payload)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create item"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Item created successfully", item)),
    ))
}

/// `GET /items` -- list items, newest first.
#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    summary = "List items",
    description = "Filters by type, location and free-text search, then paginates. Unusable filter values are ignored rather than rejected.",
    params(ListParams),
    responses(
        (status = 200, description = "One page of items", body = ItemListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .service
        .list_params(&params)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch items"))?;

    Ok(Json(
        ApiResponse::ok("Items retrieved successfully", page.items).with_pagination(page.pagination),
    ))
}

/// `GET /items/{id}` -- fetch one item.
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "Items",
    summary = "Get an item",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item details", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .service
        .get(&id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch item"))?;

    Ok(Json(ApiResponse::ok("Item retrieved successfully", item)))
}

/// `PUT /items/{id}` -- partially update an item.
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "Items",
    summary = "Update an item",
    description = "Applies only the supplied fields. `id` and `date_reported` never change.",
    params(("id" = String, Path, description = "Item ID")),
    request_body(content = ItemPatch, description = "Fields to update"),
    responses(
        (status = 200, description = "Updated item", body = ItemResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(body)?;
    let item = state
        .service
        .update(&id, &payload)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update item"))?;

    Ok(Json(ApiResponse::ok("Item updated successfully", item)))
}

/// `DELETE /items/{id}` -- remove an item.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "Items",
    summary = "Delete an item",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = DeletedResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .service
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete item"))?;

    Ok(Json(ApiResponse::<()>::ok_empty("Item deleted successfully")))
}
