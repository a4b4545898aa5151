//! # Record Traits
//!
//! Users and products have the same store shape and differ only in payload.
//! These traits capture the handful of things the generic store needs to
//! know about a record, so a single store implementation serves both.
//!
//! ```text
//!              ┌──────────────────────────────┐
//!              │        Record                │
//!              │  id() / is_active()          │
//!              │  facet() ─────► Facet        │
//!              │  search_fields()             │
//!              └──────────────┬───────────────┘
//!                ┌────────────┴────────────┐
//!                ▼                         ▼
//!         User (Facet = Role)     Product (Facet = Category)
//!         search: name, email     search: name, description
//! ```

use std::fmt::{Debug, Display};
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::types::{Category, NewProduct, NewUser, Product, Role, User};

/// The enum a store filters by: role for users, category for products.
pub trait Facet: Copy + Eq + Hash + Ord + Debug + Display + Send + Sync + 'static {
    /// Every value, in display order.
    const ALL: &'static [Self];

    /// Lowercase name.
    fn as_str(&self) -> &'static str;
}

impl Facet for Role {
    const ALL: &'static [Self] = &Role::ALL;

    fn as_str(&self) -> &'static str {
        Role::as_str(self)
    }
}

impl Facet for Category {
    const ALL: &'static [Self] = &Category::ALL;

    fn as_str(&self) -> &'static str {
        Category::as_str(self)
    }
}

/// A record that can live in an entity store.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    /// Role or category.
    type Facet: Facet;

    /// The create payload: the record minus `id` and `created_at`.
    type Draft: Clone + Debug + Send + Sync + 'static;

    /// Human-readable kind, used in errors and logs ("User", "Product").
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn facet(&self) -> Self::Facet;

    /// The two text fields a search query is matched against.
    fn search_fields(&self) -> [&str; 2];

    /// Completes a draft with the fields the service assigns.
    fn from_draft(draft: Self::Draft, id: String, created_at: DateTime<Utc>) -> Self;
}

impl Record for User {
    type Facet = Role;
    type Draft = NewUser;

    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn facet(&self) -> Role {
        self.role
    }

    fn search_fields(&self) -> [&str; 2] {
        [&self.name, &self.email]
    }

    fn from_draft(draft: NewUser, id: String, created_at: DateTime<Utc>) -> Self {
        draft.into_record(id, created_at)
    }
}

impl Record for Product {
    type Facet = Category;
    type Draft = NewProduct;

    const KIND: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn facet(&self) -> Category {
        self.category
    }

    fn search_fields(&self) -> [&str; 2] {
        [&self.name, &self.description]
    }

    fn from_draft(draft: NewProduct, id: String, created_at: DateTime<Utc>) -> Self {
        draft.into_record(id, created_at)
    }
}
