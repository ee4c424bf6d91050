//! Marketplace operations over a `Store`
//!
//! Keeps the farm/product association consistent: every product that names a
//! farm appears exactly once in that farm's list, and every id in a farm's list
//! names a product that points back. Input is validated before any write, so a
//! rejected request never changes stored state.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::{DbError, MarketStats, Store};
use crate::models::{
    Farm, FarmFields, NewFarm, NewProduct, Paginated, Pagination, Product, ProductChanges,
    ProductFields, ProductFilter, ProductWithFarm, ValidationError,
};

/// Errors surfaced by marketplace operations
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("persistence failure: {0}")]
    Persistence(DbError),
}

impl MarketError {
    fn product_not_found(id: Uuid) -> Self {
        Self::NotFound {
            resource: "product",
            id: id.to_string(),
        }
    }
}

impl From<DbError> for MarketError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Persistence(other),
        }
    }
}

pub type Result<T, E = MarketError> = std::result::Result<T, E>;

/// Farm with its products populated in list order
#[derive(Debug, Clone, PartialEq)]
pub struct FarmDetail {
    pub farm: Farm,
    pub products: Vec<Product>,
}

/// Farms and products, and the operations that link them.
#[derive(Clone)]
pub struct Marketplace {
    store: Arc<dyn Store>,
}

impl Marketplace {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn is_available(&self) -> bool {
        self.store.is_available().await
    }

    /// Close the underlying store.
    pub async fn close(&self) {
        self.store.close().await;
    }

    // ---- farms ----

    pub async fn create_farm(&self, fields: FarmFields) -> Result<Farm> {
        let farm = NewFarm::from_fields(fields)?;
        let farm = self.store.insert_farm(&farm).await?;

        tracing::info!(farm_id = %farm.id, name = %farm.name, "farm created");
        Ok(farm)
    }

    pub async fn farm(&self, id: Uuid) -> Result<Farm> {
        Ok(self.store.get_farm(id).await?)
    }

    /// A farm together with its products.
    ///
    /// The id list is rebuilt from the loaded products so both halves of the
    /// response describe the same moment.
    pub async fn farm_detail(&self, id: Uuid) -> Result<FarmDetail> {
        let mut farm = self.store.get_farm(id).await?;
        let products = self.store.farm_products(id).await?;

        farm.products = products.iter().map(|p| p.id).collect();
        Ok(FarmDetail { farm, products })
    }

    pub async fn farms(&self, page: Pagination) -> Result<Paginated<Farm>> {
        Ok(self.store.list_farms(page).await?)
    }

    /// Delete a farm and every product it owns. Returns the number of products removed.
    pub async fn delete_farm_cascade(&self, id: Uuid) -> Result<u64> {
        let removed = self.store.delete_farm_cascade(id).await?;

        tracing::info!(farm_id = %id, products_removed = removed, "farm deleted");
        Ok(removed)
    }

    // ---- products ----

    /// Create a product owned by `farm_id`.
    ///
    /// Either the product exists and is at the end of the farm's list, or
    /// nothing was written.
    pub async fn attach_product(&self, farm_id: Uuid, fields: ProductFields) -> Result<Product> {
        let product = NewProduct::from_fields(fields)?;
        let product = self.store.insert_product(&product, Some(farm_id)).await?;

        tracing::info!(
            farm_id = %farm_id,
            product_id = %product.id,
            name = %product.name,
            "product attached"
        );
        Ok(product)
    }

    pub async fn create_standalone_product(&self, fields: ProductFields) -> Result<Product> {
        let product = NewProduct::from_fields(fields)?;
        let product = self.store.insert_product(&product, None).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn product(&self, id: Uuid) -> Result<ProductWithFarm> {
        Ok(self.store.get_product(id).await?)
    }

    pub async fn products(
        &self,
        filter: &ProductFilter,
        page: Pagination,
    ) -> Result<Paginated<ProductWithFarm>> {
        Ok(self.store.list_products(filter, page).await?)
    }

    /// Partial update of name, price and category. Farm linkage never changes.
    pub async fn update_product(&self, id: Uuid, fields: ProductFields) -> Result<Product> {
        let changes = ProductChanges::from_fields(fields)?;

        if changes.is_empty() {
            return Ok(self.store.get_product(id).await?.product);
        }

        let product = self.store.update_product(id, &changes).await?;
        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Delete a product; its id leaves the owning farm's list with it.
    pub async fn detach_and_delete_product(&self, id: Uuid) -> Result<Product> {
        let product = self.store.delete_product(id).await?;

        tracing::info!(
            product_id = %id,
            farm_id = ?product.farm,
            "product deleted"
        );
        Ok(product)
    }

    /// Delete a product through its farm. Fails `NotFound` when the product
    /// belongs elsewhere or is standalone.
    pub async fn detach_from_farm(&self, farm_id: Uuid, product_id: Uuid) -> Result<Product> {
        self.store.get_farm(farm_id).await?;

        let owned = self.store.get_product(product_id).await?;
        if owned.product.farm != Some(farm_id) {
            return Err(MarketError::product_not_found(product_id));
        }

        self.detach_and_delete_product(product_id).await
    }

    pub async fn stats(&self) -> Result<MarketStats> {
        Ok(self.store.stats().await?)
    }
}
