//! `Store` backed by PostgreSQL

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repos::{FarmRepo, ProductRepo, StatsRepo};
use super::store::{DbError, MarketStats, Store};
use crate::models::{
    Farm, NewFarm, NewProduct, Paginated, Pagination, Product, ProductChanges, ProductFilter,
    ProductWithFarm,
};

/// Upper bound on the readiness check, independent of the pool's acquire timeout
const READY_TIMEOUT: Duration = Duration::from_secs(2);

/// PostgreSQL store. Cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, run migrations and wrap the pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, DbError> {
        let pool = super::pool::create_pool_with_options(database_url, max_connections).await?;
        super::migrations::run(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    /// Check out a connection (idle ones are reused, so this is usually
    /// free) and give it straight back.
    async fn is_available(&self) -> bool {
        if self.pool.is_closed() {
            return false;
        }

        match tokio::time::timeout(READY_TIMEOUT, self.pool.acquire()).await {
            Ok(Ok(_conn)) => true,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "database unreachable");
                false
            }
            Err(_) => {
                tracing::warn!(timeout = ?READY_TIMEOUT, "database readiness check timed out");
                false
            }
        }
    }

    async fn close(&self) {
        tracing::info!("closing database pool");
        self.pool.close().await;
    }

    async fn insert_farm(&self, farm: &NewFarm) -> Result<Farm, DbError> {
        FarmRepo::new(&self.pool).create(farm).await
    }

    async fn get_farm(&self, id: Uuid) -> Result<Farm, DbError> {
        FarmRepo::new(&self.pool).get(id).await
    }

    async fn list_farms(&self, page: Pagination) -> Result<Paginated<Farm>, DbError> {
        FarmRepo::new(&self.pool).list(page).await
    }

    async fn delete_farm_cascade(&self, id: Uuid) -> Result<u64, DbError> {
        FarmRepo::new(&self.pool).delete_cascade(id).await
    }

    async fn insert_product(
        &self,
        product: &NewProduct,
        farm: Option<Uuid>,
    ) -> Result<Product, DbError> {
        ProductRepo::new(&self.pool).create(product, farm).await
    }

    async fn get_product(&self, id: Uuid) -> Result<ProductWithFarm, DbError> {
        ProductRepo::new(&self.pool).get(id).await
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        page: Pagination,
    ) -> Result<Paginated<ProductWithFarm>, DbError> {
        ProductRepo::new(&self.pool).list(filter, page).await
    }

    async fn farm_products(&self, farm: Uuid) -> Result<Vec<Product>, DbError> {
        ProductRepo::new(&self.pool).for_farm(farm).await
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &ProductChanges,
    ) -> Result<Product, DbError> {
        ProductRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_product(&self, id: Uuid) -> Result<Product, DbError> {
        ProductRepo::new(&self.pool).delete(id).await
    }

    async fn stats(&self) -> Result<MarketStats, DbError> {
        StatsRepo::new(&self.pool).collect().await
    }
}
