//! PostgreSQL repositories
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Uses transactions for multi-step operations

pub mod farms;
pub mod products;
pub mod stats;

pub use farms::FarmRepo;
pub use products::ProductRepo;
pub use stats::StatsRepo;
