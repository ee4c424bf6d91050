//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use super::error::ApiError;
use crate::models::{parse_id, ValidationError};

/// Extract and validate a UUID from a single-segment path
pub struct ValidUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        Ok(Self(parse_id("id", &id)?))
    }
}

/// Farm id and product id from `/farms/{id}/products/{product_id}`
pub struct FarmProductIds {
    pub farm: Uuid,
    pub product: Uuid,
}

impl<S> FromRequestParts<S> for FarmProductIds
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((farm, product)): Path<(String, String)> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        Ok(Self {
            farm: parse_id("id", &farm)?,
            product: parse_id("product_id", &product)?,
        })
    }
}
