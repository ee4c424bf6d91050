//! Product model, categories, prices and listing filters

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{parse_id, required_text, text, ValidationError};

/// Fixed product categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fruit,
    Vegetable,
    Dairy,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fruit => "fruit",
            Self::Vegetable => "vegetable",
            Self::Dairy => "dairy",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Fruit, Self::Vegetable, Self::Dairy]
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Exact, lowercase match only: the stored enumeration is case sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fruit" => Ok(Self::Fruit),
            "vegetable" => Ok(Self::Vegetable),
            "dairy" => Ok(Self::Dairy),
            _ => Err(ValidationError::InvalidVariant {
                field: "category",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price as submitted: JSON number or numeric string (form posts)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl From<f64> for PriceInput {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for PriceInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Validated non-negative, finite price
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotANumber {
                field: "price",
                value: value.to_string(),
            });
        }

        if value < 0.0 {
            return Err(ValidationError::Negative { field: "price" });
        }

        // -0.0 passes the sign check; store it as 0.0
        Ok(Self(value + 0.0))
    }

    pub fn parse(input: &PriceInput) -> Result<Self, ValidationError> {
        match input {
            PriceInput::Number(n) => Self::new(*n),
            PriceInput::Text(s) => {
                let n: f64 = s.trim().parse().map_err(|_| ValidationError::NotANumber {
                    field: "price",
                    value: s.clone(),
                })?;
                Self::new(n)
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Format a price for display, e.g. `$1.49`.
pub fn format_usd(price: f64) -> String {
    format!("${:.2}", price)
}

/// Product as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: Category,
    /// Owning farm; `None` for standalone products
    pub farm: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product with its owning farm's name populated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithFarm {
    #[serde(flatten)]
    pub product: Product,
    pub farm_name: Option<String>,
}

/// Raw product fields as submitted by a client.
///
/// No `farm` field: linkage is only ever set by attaching to a farm.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<PriceInput>,
    pub category: Option<String>,
}

/// Validated product ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub category: Category,
}

impl NewProduct {
    /// Validate a complete set of product fields.
    ///
    /// # Example
    /// ```
    /// use farmstand_server::models::{Category, NewProduct, ProductFields};
    ///
    /// let fields = ProductFields {
    ///     name: Some("Kale".into()),
    ///     price: Some(1.49.into()),
    ///     category: Some("vegetable".into()),
    /// };
    /// let product = NewProduct::from_fields(fields).unwrap();
    /// assert_eq!(product.category, Category::Vegetable);
    /// ```
    pub fn from_fields(fields: ProductFields) -> Result<Self, ValidationError> {
        let name = required_text("name", fields.name.as_deref())?;
        let price = fields
            .price
            .as_ref()
            .ok_or(ValidationError::Missing { field: "price" })
            .and_then(Price::parse)?;
        let category = fields
            .category
            .as_deref()
            .ok_or(ValidationError::Missing { field: "category" })
            .and_then(str::parse::<Category>)?;

        Ok(Self {
            name,
            price,
            category,
        })
    }
}

/// Validated partial update of a product's scalar fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub category: Option<Category>,
}

impl ProductChanges {
    /// Validate whichever fields are present. Absent fields stay untouched.
    pub fn from_fields(fields: ProductFields) -> Result<Self, ValidationError> {
        let name = fields.name.as_deref().map(|n| text("name", n)).transpose()?;
        let price = fields.price.as_ref().map(Price::parse).transpose()?;
        let category = fields
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;

        Ok(Self {
            name,
            price,
            category,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.category.is_none()
    }

    /// Apply the changes to a product snapshot in place.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price.value();
        }
        if let Some(category) = self.category {
            product.category = category;
        }
    }
}

/// Which products to include with respect to farm ownership
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FarmScope {
    #[default]
    Any,
    Standalone,
    Farm(Uuid),
}

/// Product listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    pub farm: FarmScope,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self.category.map_or(true, |c| product.category == c);
        let search_ok = self.search.as_deref().map_or(true, |term| {
            product.name.to_lowercase().contains(&term.to_lowercase())
        });
        let farm_ok = match self.farm {
            FarmScope::Any => true,
            FarmScope::Standalone => product.farm.is_none(),
            FarmScope::Farm(id) => product.farm == Some(id),
        };

        category_ok && search_ok && farm_ok
    }
}

/// Query parameters for product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Category name, or `all`
    pub category: Option<String>,
    /// Name search term
    pub q: Option<String>,
    /// Farm id, or `none` for standalone products
    pub farm: Option<String>,
}

impl TryFrom<ProductQuery> for ProductFilter {
    type Error = ValidationError;

    fn try_from(query: ProductQuery) -> Result<Self, Self::Error> {
        let category = match query.category.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(c) => Some(c.parse()?),
        };

        let search = query
            .q
            .map(|q| q.trim().to_owned())
            .filter(|q| !q.is_empty());

        let farm = match query.farm.as_deref().map(str::trim) {
            None | Some("") => FarmScope::Any,
            Some("none") => FarmScope::Standalone,
            Some(id) => FarmScope::Farm(parse_id("farm", id)?),
        };

        Ok(Self {
            category,
            search,
            farm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: Category, farm: Option<Uuid>) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            price: 1.0,
            category,
            farm,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn category_parsing() {
        assert_eq!("fruit".parse::<Category>().unwrap(), Category::Fruit);
        assert_eq!("dairy".parse::<Category>().unwrap(), Category::Dairy);
        assert!(matches!(
            "invalid".parse::<Category>().unwrap_err(),
            ValidationError::InvalidVariant { field: "category", .. }
        ));
        assert!("Fruit".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Vegetable).unwrap(),
            "\"vegetable\""
        );
    }

    #[test]
    fn price_accepts_numbers_and_numeric_strings() {
        assert_eq!(Price::parse(&1.49.into()).unwrap().value(), 1.49);
        assert_eq!(Price::parse(&" 2.50 ".into()).unwrap().value(), 2.5);
        assert_eq!(Price::parse(&0.0.into()).unwrap().value(), 0.0);
    }

    #[test]
    fn negative_zero_price_is_stored_as_zero() {
        let price = Price::parse(&"-0".into()).unwrap();
        assert!(price.value().is_sign_positive());
        assert_eq!(serde_json::to_string(&price.value()).unwrap(), "0.0");

        assert!(Price::new(-0.0).unwrap().value().is_sign_positive());
    }

    #[test]
    fn price_rejects_negative_and_non_numeric() {
        assert_eq!(
            Price::parse(&(-0.01).into()).unwrap_err(),
            ValidationError::Negative { field: "price" }
        );
        assert!(matches!(
            Price::parse(&"cheap".into()).unwrap_err(),
            ValidationError::NotANumber { .. }
        ));
        assert!(matches!(
            Price::new(f64::NAN).unwrap_err(),
            ValidationError::NotANumber { .. }
        ));
    }

    #[test]
    fn price_input_from_json() {
        let fields: ProductFields =
            serde_json::from_str(r#"{"name":"Milk","price":3,"category":"dairy"}"#).unwrap();
        assert_eq!(fields.price, Some(PriceInput::Number(3.0)));

        let fields: ProductFields = serde_json::from_str(r#"{"price":"3.49"}"#).unwrap();
        assert_eq!(fields.price, Some(PriceInput::Text("3.49".into())));
    }

    #[test]
    fn new_product_requires_all_fields() {
        let err = NewProduct::from_fields(ProductFields {
            name: Some("Kale".into()),
            price: None,
            category: Some("vegetable".into()),
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "price" });
    }

    #[test]
    fn changes_validate_only_present_fields() {
        let changes = ProductChanges::from_fields(ProductFields {
            price: Some("4.99".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.price.map(|p| p.value()), Some(4.99));
        assert!(changes.name.is_none());
        assert!(!changes.is_empty());

        assert!(ProductChanges::from_fields(ProductFields {
            category: Some("invalid".into()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn apply_changes() {
        let mut p = product("Apple", Category::Fruit, None);
        let changes = ProductChanges {
            name: Some("Green Apple".into()),
            price: None,
            category: None,
        };
        changes.apply(&mut p);
        assert_eq!(p.name, "Green Apple");
        assert_eq!(p.category, Category::Fruit);
        assert_eq!(p.price, 1.0);
    }

    #[test]
    fn filter_matching() {
        let farm = Uuid::new_v4();
        let apple = product("Apple", Category::Fruit, Some(farm));
        let kale = product("Kale", Category::Vegetable, None);

        let filter = ProductFilter {
            search: Some("APP".into()),
            ..Default::default()
        };
        assert!(filter.matches(&apple));
        assert!(!filter.matches(&kale));

        let filter = ProductFilter {
            farm: FarmScope::Standalone,
            ..Default::default()
        };
        assert!(!filter.matches(&apple));
        assert!(filter.matches(&kale));

        let filter = ProductFilter {
            category: Some(Category::Fruit),
            farm: FarmScope::Farm(farm),
            ..Default::default()
        };
        assert!(filter.matches(&apple));
    }

    #[test]
    fn query_to_filter() {
        let farm = Uuid::new_v4();
        let filter = ProductFilter::try_from(ProductQuery {
            category: Some("all".into()),
            q: Some("  ".into()),
            farm: Some(farm.to_string()),
        })
        .unwrap();
        assert_eq!(filter.category, None);
        assert_eq!(filter.search, None);
        assert_eq!(filter.farm, FarmScope::Farm(farm));

        let filter = ProductFilter::try_from(ProductQuery {
            category: Some("dairy".into()),
            q: Some("milk".into()),
            farm: Some("none".into()),
        })
        .unwrap();
        assert_eq!(filter.category, Some(Category::Dairy));
        assert_eq!(filter.search.as_deref(), Some("milk"));
        assert_eq!(filter.farm, FarmScope::Standalone);

        assert!(ProductFilter::try_from(ProductQuery {
            category: Some("meat".into()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(1.49), "$1.49");
        assert_eq!(format_usd(3.0), "$3.00");
    }
}
