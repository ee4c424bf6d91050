//! Product endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::ValidUuid;
use crate::http::server::AppState;
use crate::models::{
    Paginated, PaginationParams, Product, ProductFields, ProductFilter, ProductQuery,
    ProductWithFarm,
};

/// GET /products?category&q&farm&page&per_page
async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<ProductWithFarm>>, ApiError> {
    let filter = ProductFilter::try_from(query)?;
    let products = state.market.products(&filter, params.into()).await?;
    Ok(Json(products))
}

/// POST /products - create a standalone product
async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<ProductFields>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.market.create_standalone_product(fields).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ProductWithFarm>, ApiError> {
    let product = state.market.product(id).await?;
    Ok(Json(product))
}

/// PUT /products/{id} - partial update; a `farm` key in the body is ignored
async fn update_product(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    Json(fields): Json<ProductFields>,
) -> Result<Json<Product>, ApiError> {
    let product = state.market.update_product(id, fields).await?;
    Ok(Json(product))
}

/// DELETE /products/{id} - returns the deleted product
async fn delete_product(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Product>, ApiError> {
    let product = state.market.detach_and_delete_product(id).await?;
    Ok(Json(product))
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
