//! Product catalog routes.
//!
//! Reads are public; writes require an admin bearer token. Responses use
//! the `{ success, data, message }` envelope.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use stride_core::ProductId;

use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::services::ProductInput;
use crate::state::AppState;

use super::ApiResponse;

/// `GET /products`
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let products = state.catalog().list().await?;
    Ok(ApiResponse::ok(products, "Products fetched successfully"))
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state.catalog().create(input).await?;

    tracing::info!(product_id = %product.id, admin_id = %admin.id, "product created");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(product, "Product created successfully"),
    ))
}

/// Update request body: the target ID plus the full replacement fields.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub id: Option<ProductId>,
    #[serde(flatten)]
    pub input: ProductInput,
}

/// `PATCH /products`
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>> {
    let id = req
        .id
        .ok_or_else(|| ApiError::Validation("id is required".to_owned()))?;

    let product = state.catalog().update(id, req.input).await?;

    tracing::info!(product_id = %product.id, admin_id = %admin.id, "product updated");

    Ok(ApiResponse::ok(product, "Product updated successfully"))
}

/// Delete request body.
#[derive(Debug, Deserialize)]
pub struct DeleteProductRequest {
    pub id: Option<ProductId>,
}

/// `DELETE /products`
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<DeleteProductRequest>,
) -> Result<Json<ApiResponse<()>>> {
    let id = req
        .id
        .ok_or_else(|| ApiError::Validation("id is required".to_owned()))?;

    state.catalog().delete(id).await?;

    tracing::info!(product_id = %id, admin_id = %admin.id, "product deleted");

    Ok(ApiResponse::ok((), "Product deleted successfully"))
}
