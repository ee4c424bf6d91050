//! Farm repository
//!
//! - reads aggregate the owned product ids in one query (no N+1)
//! - cascade delete runs in a single transaction

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::db::store::DbError;
use crate::models::{Farm, NewFarm, Paginated, Pagination};

/// Farm columns plus the product ids derived from `products.farm_id`
const FARM_SELECT: &str = r#"
    SELECT
        f.id,
        f.name,
        f.farm_type,
        f.location,
        f.email,
        f.created_at,
        COALESCE(
            ARRAY_AGG(p.id ORDER BY p.seq) FILTER (WHERE p.id IS NOT NULL),
            '{}'::uuid[]
        ) AS products
    FROM farms f
    LEFT JOIN products p ON p.farm_id = f.id
"#;

fn farm_from_row(row: &PgRow) -> Result<Farm, DbError> {
    Ok(Farm {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        kind: row.try_get("farm_type")?,
        location: row.try_get("location")?,
        email: row.try_get("email")?,
        products: row.try_get("products")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Farm repository
pub struct FarmRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FarmRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a farm. New farms own no products.
    pub async fn create(&self, farm: &NewFarm) -> Result<Farm, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO farms (name, farm_type, location, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, farm_type, location, email, created_at,
                      '{}'::uuid[] AS products
            "#,
        )
        .bind(&farm.name)
        .bind(&farm.kind)
        .bind(&farm.location)
        .bind(farm.email.as_str())
        .fetch_one(self.pool)
        .await?;

        farm_from_row(&row)
    }

    /// Get a single farm with its product ids.
    pub async fn get(&self, id: Uuid) -> Result<Farm, DbError> {
        let sql = format!("{FARM_SELECT} WHERE f.id = $1 GROUP BY f.id");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::farm_not_found(id))?;

        farm_from_row(&row)
    }

    /// List farms in creation order.
    pub async fn list(&self, page: Pagination) -> Result<Paginated<Farm>, DbError> {
        let sql = format!("{FARM_SELECT} GROUP BY f.id ORDER BY f.seq LIMIT $1 OFFSET $2");

        let rows = sqlx::query(&sql)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM farms")
            .fetch_one(self.pool)
            .await?;

        let items = rows.iter().map(farm_from_row).collect::<Result<_, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Delete every product of the farm, then the farm (atomic).
    ///
    /// The farm row is locked first so a concurrent attach either lands before
    /// the delete (and is removed with it) or sees the farm gone.
    pub async fn delete_cascade(&self, id: Uuid) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM farms WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::farm_not_found(id))?;

        let removed = sqlx::query("DELETE FROM products WHERE farm_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(removed)
    }
}
