//! Persistence layer - store trait, PostgreSQL pool/repositories, in-memory store
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default) - no Arc<Mutex<Connection>>
//! - List operations use JOINs - no N+1 queries
//! - A farm's product list is derived from `products.farm_id`, never written twice
//! - Transactions for multi-step operations

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use postgres::PgStore;
pub use store::{DbError, MarketStats, Store};
