//! Aggregate counts for the landing page and the `stats` command

use sqlx::PgPool;

use crate::db::store::{DbError, MarketStats};
use crate::models::Category;

pub struct StatsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn collect(&self) -> Result<MarketStats, DbError> {
        let mut stats = MarketStats::empty();

        let (farm_count, product_count): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM farms), (SELECT COUNT(*) FROM products)",
        )
        .fetch_one(self.pool)
        .await?;
        stats.farm_count = farm_count;
        stats.product_count = product_count;

        let by_category: Vec<(String, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM products GROUP BY category")
                .fetch_all(self.pool)
                .await?;
        for (category, count) in by_category {
            let category = category
                .parse::<Category>()
                .map_err(|e| DbError::Corrupt(e.to_string()))?;
            stats.products_by_category.insert(category, count);
        }

        let by_type: Vec<(String, i64)> =
            sqlx::query_as("SELECT farm_type, COUNT(*) FROM farms GROUP BY farm_type")
                .fetch_all(self.pool)
                .await?;
        stats.farms_by_type.extend(by_type);

        Ok(stats)
    }
}
