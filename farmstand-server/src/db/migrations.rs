//! Schema for farms and products
//!
//! A farm's product list is not a column: it is the set of products whose
//! `farm_id` points at the farm, ordered by `seq`.

use sqlx::PgPool;

/// Create tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running farmstand migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS farms (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            seq BIGINT GENERATED ALWAYS AS IDENTITY,
            name TEXT NOT NULL CHECK (btrim(name) <> ''),
            farm_type TEXT NOT NULL CHECK (btrim(farm_type) <> ''),
            location TEXT NOT NULL CHECK (btrim(location) <> ''),
            email TEXT NOT NULL CHECK (btrim(email) <> ''),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            seq BIGINT GENERATED ALWAYS AS IDENTITY,
            name TEXT NOT NULL CHECK (btrim(name) <> ''),
            price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
            category TEXT NOT NULL CHECK (category IN ('fruit', 'vegetable', 'dairy')),
            farm_id UUID REFERENCES farms(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_farms_seq ON farms(seq)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_farm ON products(farm_id, seq)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)")
        .execute(pool)
        .await?;

    tracing::info!("farmstand migrations complete");
    Ok(())
}
