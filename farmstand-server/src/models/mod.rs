//! Domain models with validation at construction
//!
//! All client input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod farm;
pub mod pagination;
pub mod product;
pub mod validation;

pub use farm::{Email, Farm, FarmFields, NewFarm};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use product::{
    format_usd, Category, FarmScope, NewProduct, Price, PriceInput, Product, ProductChanges,
    ProductFields, ProductFilter, ProductQuery, ProductWithFarm,
};
pub use validation::{parse_id, ValidationError};
