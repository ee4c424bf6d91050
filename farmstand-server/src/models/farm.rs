//! Farm model and input validation

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{required_text, ValidationError};

/// Loose address check: something@something.tld, no whitespace
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// Farm as stored, with its owned product ids in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub email: String,
    pub products: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Raw farm fields as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FarmFields {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
}

/// Validated contact email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@example.com",
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated farm ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewFarm {
    pub name: String,
    pub kind: String,
    pub location: String,
    pub email: Email,
}

impl NewFarm {
    /// Validate every required farm field.
    ///
    /// # Example
    /// ```
    /// use farmstand_server::models::{FarmFields, NewFarm};
    ///
    /// let fields = FarmFields {
    ///     name: Some("Green Meadows Dairy".into()),
    ///     kind: Some("Dairy".into()),
    ///     location: Some("Vermont Hills, VT".into()),
    ///     email: Some("contact@greenmeadows.com".into()),
    /// };
    /// assert!(NewFarm::from_fields(fields).is_ok());
    /// assert!(NewFarm::from_fields(Default::default()).is_err());
    /// ```
    pub fn from_fields(fields: FarmFields) -> Result<Self, ValidationError> {
        let name = required_text("name", fields.name.as_deref())?;
        let kind = required_text("type", fields.kind.as_deref())?;
        let location = required_text("location", fields.location.as_deref())?;
        let email = fields
            .email
            .as_deref()
            .ok_or(ValidationError::Missing { field: "email" })
            .and_then(Email::new)?;

        Ok(Self {
            name,
            kind,
            location,
            email,
        })
    }
}
