//! # Domain Types
//!
//! The two record types Backoffice manages, their facet enums and the
//! create payloads.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                    ┌─────────────────┐             │
//! │  │      User       │                    │     Product     │             │
//! │  │  ─────────────  │                    │  ─────────────  │             │
//! │  │  id             │                    │  id             │             │
//! │  │  name           │                    │  name           │             │
//! │  │  email          │                    │  description    │             │
//! │  │  role ──────────┼──► Role            │  price_cents    │             │
//! │  │  active         │    admin|user|     │  category ──────┼──► Category │
//! │  │  created_at     │    viewer          │  stock          │             │
//! │  └─────────────────┘                    │  image_url      │             │
//! │          ▲                              │  active         │             │
//! │          │ into_record(id, now)         │  created_at     │             │
//! │  ┌───────┴─────────┐                    └─────────────────┘             │
//! │  │    NewUser      │                            ▲                       │
//! │  │ (no id, no ts)  │                    ┌───────┴─────────┐             │
//! │  └─────────────────┘                    │   NewProduct    │             │
//! │                                         └─────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Records serialize with camelCase keys and lowercase enum values, which is
//! what a `GET /users` or `POST /products` body would carry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Role
// =============================================================================

/// The role a user has in the system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Default role for users created through the form.
    #[default]
    User,
    Viewer,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::User, Role::Viewer];

    /// Lowercase name, matching the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "viewer" => Ok(Role::Viewer),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// Product category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Default category for products created through the form.
    #[default]
    Electronics,
    Clothing,
    Food,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Electronics,
        Category::Clothing,
        Category::Food,
        Category::Other,
    ];

    /// Lowercase name, matching the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Food => "food",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronics" => Ok(Category::Electronics),
            "clothing" => Ok(Category::Clothing),
            "food" => Ok(Category::Food),
            "other" => Ok(Category::Other),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A person with access to the back office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique, stable identifier.
    pub id: String,

    pub name: String,

    pub email: String,

    pub role: Role,

    /// Inactive users stay in the collection but are excluded from
    /// the active count.
    pub active: bool,

    /// When the user was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an active user stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        User {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Payload for creating a user: a [`User`] without `id` and `created_at`,
/// which the service assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl NewUser {
    /// Completes the payload with server-assigned fields.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            active: self.active,
            created_at,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, stable identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-text description; searched together with the name.
    pub description: String,

    /// Price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,

    pub category: Category,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Reference to the product image (may be empty).
    pub image_url: String,

    pub active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Checks if the product is below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }
}

/// Payload for creating a product: a [`Product`] without `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub category: Category,
    pub stock: i64,
    pub image_url: String,
    pub active: bool,
}

impl NewProduct {
    /// Completes the payload with server-assigned fields.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            category: self.category,
            stock: self.stock,
            image_url: self.image_url,
            active: self.active,
            created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Viewer ".parse::<Role>().unwrap(), Role::Viewer);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("FOOD".parse::<Category>().unwrap(), Category::Food);
        assert!("toys".parse::<Category>().is_err());
    }

    #[test]
    fn test_defaults_match_form_defaults() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Category::default(), Category::Electronics);
    }

    #[test]
    fn test_user_json_shape() {
        let user = User::new("u1", "Sarah Connor", "sarah@resistance.net", Role::Admin);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["active"], true);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_new_product_into_record() {
        let payload = NewProduct {
            name: "Desk Lamp".to_string(),
            description: "LED lamp".to_string(),
            price_cents: 2599,
            category: Category::Other,
            stock: 3,
            image_url: String::new(),
            active: true,
        };
        let now = Utc::now();
        let product = payload.into_record("p9".to_string(), now);
        assert_eq!(product.id, "p9");
        assert_eq!(product.created_at, now);
        assert_eq!(product.price_cents, 2599);
        assert!(product.is_low_stock(10));
    }
}
