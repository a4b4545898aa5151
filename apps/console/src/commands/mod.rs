//! # Page Commands
//!
//! Handlers the shell calls for each page. They translate a gesture into a
//! store call and hand back DTOs; the rules live in the stores.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (gestures shared by both pages)
//! ├── users.rs     ◄─── /users page DTO, user form submit
//! └── products.rs  ◄─── /products page DTO, product form submit, detail
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Shell line                                                             │
//! │  ──────────                                                             │
//! │  "filter admin"                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::filter(&store, "admin")   ◄── parse + validate only          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  EntityStore::set_filter(..)         ◄── store owns the state           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  users::list_users(&store)           ◄── derived views → UsersPageDto   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  render::users_page(&dto)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod products;
pub mod users;

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use backoffice_core::validation::validate_search_query;
use backoffice_core::{Facet, Filter, Record};

use crate::error::ApiError;
use crate::state::{Breakdown, EntityStore, Outcome};

/// One row of a per-facet breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCountDto {
    pub facet: String,
    pub count: usize,
}

/// Flattens a breakdown for display.
pub fn breakdown_dto<F: Facet>(breakdown: &Breakdown<F>) -> Vec<FacetCountDto> {
    breakdown
        .iter()
        .map(|(facet, count)| FacetCountDto {
            facet: facet.as_str().to_string(),
            count: *count,
        })
        .collect()
}

/// Sets the search text. An empty query clears the text filter.
pub fn search<R: Record>(store: &EntityStore<R>, query: &str) -> Result<String, ApiError> {
    let query = validate_search_query(query)?;
    debug!(kind = R::KIND, query = %query, "search command");
    store.set_search(query.clone());
    Ok(query)
}

/// Sets the facet filter from `all` or a facet name.
pub fn filter<R: Record>(
    store: &EntityStore<R>,
    input: &str,
) -> Result<Filter<R::Facet>, ApiError> {
    let filter = Filter::<R::Facet>::parse(input).ok_or_else(|| {
        let allowed: Vec<&str> = R::Facet::ALL.iter().map(|f| f.as_str()).collect();
        ApiError::validation(format!(
            "Unknown filter '{}'. Use all, {}",
            input.trim(),
            allowed.join(", ")
        ))
    })?;
    debug!(kind = R::KIND, filter = %filter, "filter command");
    store.set_filter(filter);
    Ok(filter)
}

/// Toggles the selection. Returns the selected id afterwards.
pub fn select<R: Record>(store: &EntityStore<R>, id: &str) -> Option<String> {
    let id = id.trim();
    if store.entities().iter().all(|r| r.id() != id) {
        warn!(kind = R::KIND, id = %id, "Selecting an id that is not loaded");
    }
    store.select(id)
}

pub fn toggle<R: Record>(store: &EntityStore<R>, id: &str) -> Result<R, ApiError> {
    Ok(store.toggle_active(id.trim())?)
}

pub fn remove<R: Record>(store: &EntityStore<R>, id: &str) -> Result<R, ApiError> {
    Ok(store.remove(id.trim())?)
}

/// Reloads from the service. This is the only recovery from a failed load.
pub fn retry<R: Record>(store: &EntityStore<R>) -> impl Future<Output = Outcome> + Send + 'static {
    debug!(kind = R::KIND, previous_error = ?store.error(), "retry command");
    store.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use backoffice_core::{Role, User};
    use backoffice_data::{Latency, MockUserService};

    use crate::error::ErrorCode;

    async fn seeded() -> EntityStore<User> {
        let store = EntityStore::new(Arc::new(MockUserService::new(Latency::none())));
        assert!(store.load().await.is_applied());
        store
    }

    #[tokio::test]
    async fn test_filter_parses_facets() {
        let store = seeded().await;
        assert_eq!(filter(&store, "Admin").unwrap(), Filter::Only(Role::Admin));
        assert_eq!(store.filtered().len(), 2);
        assert_eq!(filter(&store, "all").unwrap(), Filter::All);
        assert_eq!(store.filtered().len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_filter_is_rejected() {
        let store = seeded().await;
        let err = filter(&store, "root").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("admin, user, viewer"));
        assert_eq!(store.filter(), Filter::All);
    }

    #[tokio::test]
    async fn test_overlong_search_is_rejected() {
        let store = seeded().await;
        assert!(search(&store, &"x".repeat(101)).is_err());
        assert_eq!(store.search(), "");
        assert_eq!(search(&store, "connor").unwrap(), "connor");
        assert_eq!(store.filtered().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_missing_id_is_not_found() {
        let store = seeded().await;
        let err = toggle(&store, "u404").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(!toggle(&store, "u1").unwrap().active);
    }

    #[tokio::test]
    async fn test_breakdown_dto_lists_every_facet() {
        let store = seeded().await;
        let rows = breakdown_dto(&store.breakdown());
        let names: Vec<&str> = rows.iter().map(|r| r.facet.as_str()).collect();
        assert_eq!(names, ["admin", "user", "viewer"]);
        assert_eq!(rows.iter().map(|r| r.count).sum::<usize>(), 5);
    }
}
