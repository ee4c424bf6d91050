//! farmstand-server: farms, products, and the link between them
//!
//! - `models`: validated input and stored shapes
//! - `db`: the `Store` seam with PostgreSQL and in-memory implementations
//! - `market`: operations that keep farm product lists consistent
//! - `seed`: demo dataset
//! - `http`: axum router and server

pub mod db;
pub mod http;
pub mod market;
pub mod models;
pub mod seed;

pub use db::{MemoryStore, PgStore, Store};
pub use http::{build_router, run_server, AppState, ServerConfig};
pub use market::{FarmDetail, MarketError, Marketplace};
