//! In-memory `Store` for tests and `serve --memory`
//!
//! Every operation takes the single lock once, so multi-row operations
//! (attach, cascade delete) are atomic with respect to other requests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{DbError, MarketStats, Store};
use crate::models::{
    Farm, NewFarm, NewProduct, Paginated, Pagination, Product, ProductChanges, ProductFilter,
    ProductWithFarm,
};

struct FarmRow {
    seq: u64,
    farm: Farm,
}

struct ProductRow {
    seq: u64,
    product: Product,
}

#[derive(Default)]
struct Tables {
    farms: HashMap<Uuid, FarmRow>,
    products: HashMap<Uuid, ProductRow>,
    next_seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Owned products of a farm in insertion order.
    fn owned_by(&self, farm: Uuid) -> Vec<&ProductRow> {
        let mut owned: Vec<_> = self
            .products
            .values()
            .filter(|row| row.product.farm == Some(farm))
            .collect();
        owned.sort_by_key(|row| row.seq);
        owned
    }

    /// Farm snapshot with the derived product list filled in.
    fn farm_snapshot(&self, row: &FarmRow) -> Farm {
        let mut farm = row.farm.clone();
        farm.products = self
            .owned_by(farm.id)
            .into_iter()
            .map(|p| p.product.id)
            .collect();
        farm
    }

    fn with_farm_name(&self, product: &Product) -> ProductWithFarm {
        ProductWithFarm {
            product: product.clone(),
            farm_name: product
                .farm
                .and_then(|id| self.farms.get(&id))
                .map(|row| row.farm.name.clone()),
        }
    }
}

/// Process-local store backed by hash maps
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle availability, e.g. to exercise the 503 guard.
    pub fn set_available(&self, available: bool) {
        self.closed.store(!available, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn is_available(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.set_available(false);
    }

    async fn insert_farm(&self, farm: &NewFarm) -> Result<Farm, DbError> {
        let mut tables = self.tables.write().await;
        let seq = tables.next_seq();

        let farm = Farm {
            id: Uuid::new_v4(),
            name: farm.name.clone(),
            kind: farm.kind.clone(),
            location: farm.location.clone(),
            email: farm.email.as_str().to_owned(),
            products: Vec::new(),
            created_at: Utc::now(),
        };

        tables.farms.insert(
            farm.id,
            FarmRow {
                seq,
                farm: farm.clone(),
            },
        );
        Ok(farm)
    }

    async fn get_farm(&self, id: Uuid) -> Result<Farm, DbError> {
        let tables = self.tables.read().await;
        let row = tables
            .farms
            .get(&id)
            .ok_or_else(|| DbError::farm_not_found(id))?;
        Ok(tables.farm_snapshot(row))
    }

    async fn list_farms(&self, page: Pagination) -> Result<Paginated<Farm>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables.farms.values().collect();
        rows.sort_by_key(|row| row.seq);

        let farms = rows.into_iter().map(|row| tables.farm_snapshot(row)).collect();
        Ok(Paginated::from_vec(farms, page))
    }

    async fn delete_farm_cascade(&self, id: Uuid) -> Result<u64, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.farms.contains_key(&id) {
            return Err(DbError::farm_not_found(id));
        }

        let before = tables.products.len();
        tables.products.retain(|_, row| row.product.farm != Some(id));
        let removed = (before - tables.products.len()) as u64;

        tables.farms.remove(&id);
        Ok(removed)
    }

    async fn insert_product(
        &self,
        product: &NewProduct,
        farm: Option<Uuid>,
    ) -> Result<Product, DbError> {
        let mut tables = self.tables.write().await;
        if let Some(farm_id) = farm {
            if !tables.farms.contains_key(&farm_id) {
                return Err(DbError::farm_not_found(farm_id));
            }
        }

        let seq = tables.next_seq();
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name.clone(),
            price: product.price.value(),
            category: product.category,
            farm,
            created_at: now,
            updated_at: now,
        };

        tables.products.insert(
            product.id,
            ProductRow {
                seq,
                product: product.clone(),
            },
        );
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> Result<ProductWithFarm, DbError> {
        let tables = self.tables.read().await;
        let row = tables
            .products
            .get(&id)
            .ok_or_else(|| DbError::product_not_found(id))?;
        Ok(tables.with_farm_name(&row.product))
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        page: Pagination,
    ) -> Result<Paginated<ProductWithFarm>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables
            .products
            .values()
            .filter(|row| filter.matches(&row.product))
            .collect();
        rows.sort_by_key(|row| row.seq);

        let listings = rows
            .into_iter()
            .map(|row| tables.with_farm_name(&row.product))
            .collect();
        Ok(Paginated::from_vec(listings, page))
    }

    async fn farm_products(&self, farm: Uuid) -> Result<Vec<Product>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .owned_by(farm)
            .into_iter()
            .map(|row| row.product.clone())
            .collect())
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &ProductChanges,
    ) -> Result<Product, DbError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .products
            .get_mut(&id)
            .ok_or_else(|| DbError::product_not_found(id))?;

        changes.apply(&mut row.product);
        row.product.updated_at = Utc::now();
        Ok(row.product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> Result<Product, DbError> {
        let mut tables = self.tables.write().await;
        tables
            .products
            .remove(&id)
            .map(|row| row.product)
            .ok_or_else(|| DbError::product_not_found(id))
    }

    async fn stats(&self) -> Result<MarketStats, DbError> {
        let tables = self.tables.read().await;
        let mut stats = MarketStats::empty();

        stats.farm_count = tables.farms.len() as i64;
        stats.product_count = tables.products.len() as i64;

        for row in tables.products.values() {
            *stats
                .products_by_category
                .entry(row.product.category)
                .or_insert(0) += 1;
        }
        for row in tables.farms.values() {
            *stats
                .farms_by_type
                .entry(row.farm.kind.clone())
                .or_insert(0) += 1;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Email, FarmScope, Price};

    fn farm(name: &str) -> NewFarm {
        NewFarm {
            name: name.into(),
            kind: "Mixed".into(),
            location: "Napa Valley, CA".into(),
            email: Email::new("info@sunnyvalley.com").unwrap(),
        }
    }

    fn product(name: &str, category: Category) -> NewProduct {
        NewProduct {
            name: name.into(),
            price: Price::new(2.0).unwrap(),
            category,
        }
    }

    #[tokio::test]
    async fn farm_list_follows_insertion_order() {
        let store = MemoryStore::new();
        let f = store.insert_farm(&farm("Sunny Valley")).await.unwrap();

        let a = store
            .insert_product(&product("Apple", Category::Fruit), Some(f.id))
            .await
            .unwrap();
        let b = store
            .insert_product(&product("Milk", Category::Dairy), Some(f.id))
            .await
            .unwrap();
        let c = store
            .insert_product(&product("Kale", Category::Vegetable), Some(f.id))
            .await
            .unwrap();

        let stored = store.get_farm(f.id).await.unwrap();
        assert_eq!(stored.products, vec![a.id, b.id, c.id]);

        store.delete_product(b.id).await.unwrap();
        let stored = store.get_farm(f.id).await.unwrap();
        assert_eq!(stored.products, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn insert_into_missing_farm_persists_nothing() {
        let store = MemoryStore::new();
        let err = store
            .insert_product(&product("Apple", Category::Fruit), Some(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { resource: "farm", .. }));
        assert_eq!(store.stats().await.unwrap().product_count, 0);
    }

    #[tokio::test]
    async fn cascade_only_removes_owned_products() {
        let store = MemoryStore::new();
        let doomed = store.insert_farm(&farm("Doomed")).await.unwrap();
        let kept = store.insert_farm(&farm("Kept")).await.unwrap();

        for name in ["A", "B"] {
            store
                .insert_product(&product(name, Category::Fruit), Some(doomed.id))
                .await
                .unwrap();
        }
        let survivor = store
            .insert_product(&product("C", Category::Fruit), Some(kept.id))
            .await
            .unwrap();
        let standalone = store
            .insert_product(&product("D", Category::Fruit), None)
            .await
            .unwrap();

        assert_eq!(store.delete_farm_cascade(doomed.id).await.unwrap(), 2);
        assert!(store.get_farm(doomed.id).await.is_err());
        assert!(store.get_product(survivor.id).await.is_ok());
        assert!(store.get_product(standalone.id).await.is_ok());
    }

    #[tokio::test]
    async fn listing_filters_and_populates_farm_name() {
        let store = MemoryStore::new();
        let f = store.insert_farm(&farm("Green Meadows")).await.unwrap();
        store
            .insert_product(&product("Whole Milk", Category::Dairy), Some(f.id))
            .await
            .unwrap();
        store
            .insert_product(&product("Oat Milk", Category::Dairy), None)
            .await
            .unwrap();

        let filter = ProductFilter {
            search: Some("milk".into()),
            farm: FarmScope::Farm(f.id),
            ..Default::default()
        };
        let page = store
            .list_products(&filter, Pagination::default())
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].product.name, "Whole Milk");
        assert_eq!(page.items[0].farm_name.as_deref(), Some("Green Meadows"));
    }

    #[tokio::test]
    async fn stats_count_everything() {
        let store = MemoryStore::new();
        let f = store.insert_farm(&farm("Sunny Valley")).await.unwrap();
        store
            .insert_product(&product("Apple", Category::Fruit), Some(f.id))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.farm_count, 1);
        assert_eq!(stats.product_count, 1);
        assert_eq!(stats.products_by_category[&Category::Fruit], 1);
        assert_eq!(stats.products_by_category[&Category::Dairy], 0);
        assert_eq!(stats.farms_by_type["Mixed"], 1);
    }

    #[tokio::test]
    async fn close_makes_store_unavailable() {
        let store = MemoryStore::new();
        assert!(store.is_available().await);
        store.close().await;
        assert!(!store.is_available().await);
    }
}
