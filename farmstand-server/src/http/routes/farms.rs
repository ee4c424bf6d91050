//! Farm endpoints, including the nested product routes

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::extractors::{FarmProductIds, ValidUuid};
use crate::http::server::AppState;
use crate::models::{Farm, FarmFields, Paginated, PaginationParams, Product, ProductFields};

/// Farm with its products populated in list order
#[derive(Serialize)]
pub struct FarmDetailResponse {
    #[serde(flatten)]
    pub farm: Farm,
    pub product_details: Vec<Product>,
}

/// Products of one farm
#[derive(Serialize)]
pub struct FarmProductsResponse {
    pub farm_id: Uuid,
    pub farm_name: String,
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct FarmDeletedResponse {
    pub id: Uuid,
    pub products_removed: u64,
}

/// GET /farms - list farms in creation order
async fn list_farms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Farm>>, ApiError> {
    let farms = state.market.farms(params.into()).await?;
    Ok(Json(farms))
}

/// POST /farms - create a farm
async fn create_farm(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FarmFields>,
) -> Result<(StatusCode, Json<Farm>), ApiError> {
    let farm = state.market.create_farm(fields).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

/// GET /farms/{id} - farm with populated products
async fn get_farm(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<FarmDetailResponse>, ApiError> {
    let detail = state.market.farm_detail(id).await?;
    Ok(Json(FarmDetailResponse {
        farm: detail.farm,
        product_details: detail.products,
    }))
}

/// DELETE /farms/{id} - delete a farm and every product it owns
async fn delete_farm(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<FarmDeletedResponse>, ApiError> {
    let products_removed = state.market.delete_farm_cascade(id).await?;
    Ok(Json(FarmDeletedResponse {
        id,
        products_removed,
    }))
}

/// GET /farms/{id}/products
async fn list_farm_products(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<FarmProductsResponse>, ApiError> {
    let detail = state.market.farm_detail(id).await?;
    Ok(Json(FarmProductsResponse {
        farm_id: detail.farm.id,
        farm_name: detail.farm.name,
        products: detail.products,
    }))
}

/// POST /farms/{id}/products - create a product owned by the farm
async fn attach_product(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    Json(fields): Json<ProductFields>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.market.attach_product(id, fields).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// DELETE /farms/{id}/products/{product_id}
async fn detach_product(
    State(state): State<Arc<AppState>>,
    ids: FarmProductIds,
) -> Result<Json<Product>, ApiError> {
    let product = state.market.detach_from_farm(ids.farm, ids.product).await?;
    Ok(Json(product))
}

/// Farm routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/farms", get(list_farms).post(create_farm))
        .route("/farms/{id}", get(get_farm).delete(delete_farm))
        .route(
            "/farms/{id}/products",
            get(list_farm_products).post(attach_product),
        )
        .route("/farms/{id}/products/{product_id}", delete(detach_product))
}
