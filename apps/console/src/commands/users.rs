//! # User Commands
//!
//! The `/users` page: the list with its counts, and the create form.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, info};

use backoffice_core::{LoadStatus, User};

use super::{breakdown_dto, FacetCountDto};
use crate::error::ApiError;
use crate::forms::{parse_user, FormInput};
use crate::state::{Outcome, UsersStore};

/// User row for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    /// `YYYY-MM-DD`
    pub created_at: String,
    pub selected: bool,
}

impl UserDto {
    fn from_user(user: &User, selected: Option<&str>) -> Self {
        UserDto {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            active: user.active,
            created_at: user.created_at.format("%Y-%m-%d").to_string(),
            selected: selected == Some(user.id.as_str()),
        }
    }
}

/// Everything the users page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPageDto {
    pub status: LoadStatus,
    pub error: Option<String>,
    pub total: usize,
    pub active: usize,
    pub admins: usize,
    pub breakdown: Vec<FacetCountDto>,
    pub query: String,
    pub filter: String,
    /// Filtered users.
    pub rows: Vec<UserDto>,
    pub selected: Option<UserDto>,
}

/// Builds the users page from the store's derived views.
pub fn list_users(store: &UsersStore) -> UsersPageDto {
    let selected_id = store.selected_id();
    let selected_id = selected_id.as_deref();

    let rows: Vec<UserDto> = store
        .filtered_users()
        .iter()
        .map(|u| UserDto::from_user(u, selected_id))
        .collect();

    debug!(rows = rows.len(), "list_users command");

    UsersPageDto {
        status: store.loading_state().status(),
        error: store.error(),
        total: store.count(),
        active: store.active_count(),
        admins: store.admin_count(),
        breakdown: breakdown_dto(&store.breakdown()),
        query: store.search(),
        filter: store.filter().to_string(),
        rows,
        selected: store
            .selected_user()
            .map(|u| UserDto::from_user(&u, selected_id)),
    }
}

/// Validates the user form and starts the create request.
///
/// An invalid form never reaches the store. On success the returned future
/// completes the request; the store is already marked loading.
pub fn create_user(
    store: &UsersStore,
    form: &FormInput,
) -> Result<impl Future<Output = Outcome> + Send + 'static, ApiError> {
    let draft = parse_user(form)?;
    info!(email = %draft.email, role = %draft.role, "create_user command");
    Ok(store.create_user(draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use backoffice_data::{Latency, MockUserService};

    use crate::commands;
    use crate::error::ErrorCode;

    async fn seeded() -> UsersStore {
        let store = UsersStore::new(Arc::new(MockUserService::new(Latency::none())));
        store.load_users().await;
        store
    }

    #[tokio::test]
    async fn test_page_counts() {
        let page = list_users(&seeded().await);
        assert_eq!(page.status, LoadStatus::Ready);
        assert_eq!(page.total, 5);
        assert_eq!(page.active, 4);
        assert_eq!(page.admins, 2);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.filter, "all");
        assert!(page.selected.is_none());
    }

    #[tokio::test]
    async fn test_admin_sarah_page() {
        let store = seeded().await;
        commands::filter(&store, "admin").unwrap();
        commands::search(&store, "sarah").unwrap();
        commands::select(&store, "u1");

        let page = list_users(&store);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].name, "Sarah Connor");
        assert!(page.rows[0].selected);
        assert_eq!(page.selected.unwrap().email, page.rows[0].email);
        // Counts ignore the filter.
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn test_invalid_form_does_not_touch_store() {
        let store = seeded().await;
        let rev = store.revision();
        let form = FormInput::parse("name=A email=a@example.com").unwrap();
        let err = create_user(&store, &form).err().unwrap();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.revision(), rev);
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_create_appends_user() {
        let store = seeded().await;
        let form = FormInput::parse(r#"name="Ann Lee" email=ann@example.com role=viewer"#).unwrap();
        let outcome = create_user(&store, &form).unwrap().await;
        assert_eq!(outcome, Outcome::Applied);

        let page = list_users(&store);
        assert_eq!(page.total, 6);
        let ann = page.rows.last().unwrap();
        assert_eq!(ann.name, "Ann Lee");
        assert_eq!(ann.role, "viewer");
        assert!(ann.active);
    }
}
