//! Route handlers organized by resource

pub mod farms;
pub mod health;
pub mod products;
pub mod stats;
