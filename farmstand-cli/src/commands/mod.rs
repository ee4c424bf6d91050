//! Command implementations for the farmstand CLI

pub mod seed;
pub mod serve;
pub mod stats;

use std::sync::Arc;

use anyhow::{Context, Result};
use farmstand_server::{Marketplace, PgStore};

pub use seed::{run_seed, SeedArgs};
pub use serve::{run_serve, ServeArgs};
pub use stats::{run_stats, StatsArgs};

/// Connect to PostgreSQL, apply migrations and wrap the store.
async fn connect(database_url: Option<String>, max_connections: u32) -> Result<Marketplace> {
    let database_url = database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or a .env file")?;

    let store = PgStore::connect(&database_url, max_connections)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(Marketplace::new(Arc::new(store)))
}
