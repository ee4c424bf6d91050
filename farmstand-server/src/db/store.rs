//! Persistence seam shared by the PostgreSQL and in-memory stores

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Category, Farm, NewFarm, NewProduct, Paginated, Pagination, Product, ProductChanges,
    ProductFilter, ProductWithFarm,
};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// A stored row could not be turned back into a domain value
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl DbError {
    /// The backend could not be reached (as opposed to a failing query).
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Sqlx(
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
            )
        )
    }

    pub fn farm_not_found(id: Uuid) -> Self {
        Self::NotFound {
            resource: "farm",
            id: id.to_string(),
        }
    }

    pub fn product_not_found(id: Uuid) -> Self {
        Self::NotFound {
            resource: "product",
            id: id.to_string(),
        }
    }
}

/// Counts shown on the landing page and by `farmstand stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketStats {
    pub farm_count: i64,
    pub product_count: i64,
    /// Every category is present, zero when empty
    pub products_by_category: BTreeMap<Category, i64>,
    pub farms_by_type: BTreeMap<String, i64>,
}

impl MarketStats {
    /// Start with zeroed category counts so absent categories still show up.
    pub fn empty() -> Self {
        Self {
            products_by_category: Category::all().iter().map(|c| (*c, 0)).collect(),
            ..Default::default()
        }
    }
}

/// Document-style persistence for farms and products.
///
/// A farm's `products` list is never written directly: implementations derive
/// it from each product's farm reference, in insertion order. Operations that
/// touch more than one row (attach, cascade delete) are atomic.
#[async_trait]
pub trait Store: Send + Sync {
    /// Whether the store can serve a request right now. Bounded in time.
    async fn is_available(&self) -> bool;

    /// Release connections. The store is unavailable afterwards.
    async fn close(&self);

    async fn insert_farm(&self, farm: &NewFarm) -> Result<Farm, DbError>;

    async fn get_farm(&self, id: Uuid) -> Result<Farm, DbError>;

    /// Farms in creation order.
    async fn list_farms(&self, page: Pagination) -> Result<Paginated<Farm>, DbError>;

    /// Delete a farm and every product referencing it; returns products removed.
    async fn delete_farm_cascade(&self, id: Uuid) -> Result<u64, DbError>;

    /// Insert a product, attached to `farm` when given.
    ///
    /// Fails with `NotFound` (and persists nothing) if the farm does not exist.
    async fn insert_product(
        &self,
        product: &NewProduct,
        farm: Option<Uuid>,
    ) -> Result<Product, DbError>;

    async fn get_product(&self, id: Uuid) -> Result<ProductWithFarm, DbError>;

    /// Products matching `filter`, in creation order.
    async fn list_products(
        &self,
        filter: &ProductFilter,
        page: Pagination,
    ) -> Result<Paginated<ProductWithFarm>, DbError>;

    /// All products owned by a farm, in the farm's list order.
    async fn farm_products(&self, farm: Uuid) -> Result<Vec<Product>, DbError>;

    /// Update scalar fields; farm linkage is untouched.
    async fn update_product(&self, id: Uuid, changes: &ProductChanges)
        -> Result<Product, DbError>;

    /// Delete a product, returning the removed snapshot.
    async fn delete_product(&self, id: Uuid) -> Result<Product, DbError>;

    async fn stats(&self) -> Result<MarketStats, DbError>;
}
