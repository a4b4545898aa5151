//! # backoffice-core: Pure Domain Logic for Backoffice
//!
//! This crate holds everything about users and products that can be
//! expressed without I/O: the record types, the normalized collection the
//! stores keep them in, the loading-state fragment, filter predicates and
//! the memoization primitives derived views are built on.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Backoffice Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console Shell (apps/console)                 │   │
//! │  │    /users page ──► UsersStore      /products page ──► Products  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ store methods                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ backoffice-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ collection │  │  loading  │  │  filter   │  │   │
//! │  │   │   User    │  │ Entity     │  │ Loading   │  │ Filter<F> │  │   │
//! │  │   │  Product  │  │ Collection │  │ State     │  │ matches   │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌────────────┐                                │   │
//! │  │   │ reactive  │  │ validation │                                │   │
//! │  │   │ Versioned │  │ form rules │                                │   │
//! │  │   │ Memo      │  │            │                                │   │
//! │  │   └───────────┘  └────────────┘                                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • NO TIMERS • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              backoffice-data (Mock Services)                    │   │
//! │  │        get_all, get_by_id, create, delete with latency          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (User, Product, Role, Category, payloads)
//! - [`record`] - Traits that let one store implementation serve both records
//! - [`collection`] - Normalized id → record map with explicit ordering
//! - [`loading`] - Reusable loading / error / ready fragment
//! - [`filter`] - Facet filter and case-insensitive search
//! - [`reactive`] - Version-tracked values and memoized derivations
//! - [`validation`] - Form input constraints
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::collection::EntityCollection;
//! use backoffice_core::filter::{apply, Filter};
//! use backoffice_core::types::{Role, User};
//!
//! let mut users = EntityCollection::new();
//! users.set_all(vec![
//!     User::new("u1", "Sarah Connor", "sarah@resistance.net", Role::Admin),
//!     User::new("u2", "John Connor", "john@resistance.net", Role::User),
//! ]);
//!
//! let admins = apply(users.iter(), &Filter::Only(Role::Admin), "SARAH");
//! assert_eq!(admins.len(), 1);
//! assert_eq!(admins[0].name, "Sarah Connor");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod error;
pub mod filter;
pub mod loading;
pub mod reactive;
pub mod record;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use collection::EntityCollection;
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::Filter;
pub use loading::{LoadStatus, LoadingState};
pub use record::{Facet, Record};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a product counts as "low stock".
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Minimum length of a user or product name entered through a form.
pub const MIN_NAME_LEN: usize = 2;
