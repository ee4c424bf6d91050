//! Product repository
//!
//! - attach: farm existence check and insert in one transaction
//! - list: LEFT JOIN for the farm name (no N+1), filters pushed into SQL

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::db::store::DbError;
use crate::models::{
    Category, FarmScope, NewProduct, Paginated, Pagination, Product, ProductChanges,
    ProductFilter, ProductWithFarm,
};

const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.price, p.category, p.farm_id, p.created_at, p.updated_at";

/// Filter clause shared by the page query and its count.
///
/// $1 category, $2 ILIKE pattern, $3 scope ('any' | 'standalone' | 'farm'), $4 farm id
const FILTER_WHERE: &str = r#"
    WHERE ($1::text IS NULL OR p.category = $1)
      AND ($2::text IS NULL OR p.name ILIKE $2)
      AND (
            $3::text = 'any'
         OR ($3::text = 'standalone' AND p.farm_id IS NULL)
         OR ($3::text = 'farm' AND p.farm_id = $4)
      )
"#;

fn product_from_row(row: &PgRow) -> Result<Product, DbError> {
    let category: String = row.try_get("category")?;
    let category = category
        .parse::<Category>()
        .map_err(|e| DbError::Corrupt(e.to_string()))?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        category,
        farm: row.try_get("farm_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn listing_from_row(row: &PgRow) -> Result<ProductWithFarm, DbError> {
    Ok(ProductWithFarm {
        product: product_from_row(row)?,
        farm_name: row.try_get("farm_name")?,
    })
}

/// `%term%` with LIKE wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn scope_params(scope: FarmScope) -> (&'static str, Option<Uuid>) {
    match scope {
        FarmScope::Any => ("any", None),
        FarmScope::Standalone => ("standalone", None),
        FarmScope::Farm(id) => ("farm", Some(id)),
    }
}

/// Translate a foreign key violation on `farm_id` into a missing farm.
fn missing_farm_on_fk(err: sqlx::Error, farm: Option<Uuid>) -> DbError {
    match (&err, farm) {
        (sqlx::Error::Database(db), Some(farm)) if db.is_foreign_key_violation() => {
            DbError::farm_not_found(farm)
        }
        _ => DbError::Sqlx(err),
    }
}

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product, optionally attached to a farm (atomic).
    ///
    /// The farm row is share-locked so it cannot be deleted between the check
    /// and the insert; either the product is created attached or not at all.
    pub async fn create(
        &self,
        product: &NewProduct,
        farm: Option<Uuid>,
    ) -> Result<Product, DbError> {
        let mut tx = self.pool.begin().await?;

        if let Some(farm_id) = farm {
            sqlx::query("SELECT id FROM farms WHERE id = $1 FOR KEY SHARE")
                .bind(farm_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::farm_not_found(farm_id))?;
        }

        let row = sqlx::query(
            r#"
            INSERT INTO products (name, price, category, farm_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, category, farm_id, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(product.price.value())
        .bind(product.category.as_str())
        .bind(farm)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| missing_farm_on_fk(e, farm))?;

        let created = product_from_row(&row)?;
        tx.commit().await?;
        Ok(created)
    }

    /// Get a single product with its farm's name.
    pub async fn get(&self, id: Uuid) -> Result<ProductWithFarm, DbError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}, f.name AS farm_name
             FROM products p
             LEFT JOIN farms f ON f.id = p.farm_id
             WHERE p.id = $1"
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::product_not_found(id))?;

        listing_from_row(&row)
    }

    /// List products matching a filter, in creation order.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: Pagination,
    ) -> Result<Paginated<ProductWithFarm>, DbError> {
        let category = filter.category.map(|c| c.as_str());
        let pattern = filter.search.as_deref().map(like_pattern);
        let (scope, farm_id) = scope_params(filter.farm);

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}, f.name AS farm_name
             FROM products p
             LEFT JOIN farms f ON f.id = p.farm_id
             {FILTER_WHERE}
             ORDER BY p.seq
             LIMIT $5 OFFSET $6"
        );

        let rows = sqlx::query(&sql)
            .bind(category)
            .bind(pattern.as_deref())
            .bind(scope)
            .bind(farm_id)
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM products p {FILTER_WHERE}");
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(category)
            .bind(pattern.as_deref())
            .bind(scope)
            .bind(farm_id)
            .fetch_one(self.pool)
            .await?;

        let items = rows.iter().map(listing_from_row).collect::<Result<_, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// All products of a farm in list order.
    pub async fn for_farm(&self, farm_id: Uuid) -> Result<Vec<Product>, DbError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.farm_id = $1 ORDER BY p.seq"
        );

        let rows = sqlx::query(&sql).bind(farm_id).fetch_all(self.pool).await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Update scalar fields in place. `farm_id` is never written here.
    pub async fn update(&self, id: Uuid, changes: &ProductChanges) -> Result<Product, DbError> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                category = COALESCE($4, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, category, farm_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.price.map(|p| p.value()))
        .bind(changes.category.map(|c| c.as_str()))
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::product_not_found(id))?;

        product_from_row(&row)
    }

    /// Delete a product. Its id leaves the farm's list with the row itself.
    pub async fn delete(&self, id: Uuid) -> Result<Product, DbError> {
        let row = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, name, price, category, farm_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::product_not_found(id))?;

        product_from_row(&row)
    }
}
