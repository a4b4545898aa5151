//! # Users Store
//!
//! [`EntityStore<User>`] with user-specific names and the admin count.

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use backoffice_core::{Filter, NewUser, Role, User};
use backoffice_data::RecordService;

use super::store::{EntityStore, Outcome};

/// The `/users` page store.
#[derive(Debug, Clone)]
pub struct UsersStore {
    inner: EntityStore<User>,
}

impl UsersStore {
    pub fn new(service: Arc<dyn RecordService<User>>) -> Self {
        UsersStore {
            inner: EntityStore::new(service),
        }
    }

    /// All users, in collection order.
    pub fn users(&self) -> Arc<[User]> {
        self.inner.entities()
    }

    pub fn filtered_users(&self) -> Arc<[User]> {
        self.inner.filtered()
    }

    pub fn active_users(&self) -> Arc<[User]> {
        self.inner.active()
    }

    pub fn selected_user(&self) -> Option<User> {
        self.inner.selected()
    }

    /// Users with the admin role, active or not.
    pub fn admin_count(&self) -> usize {
        self.inner.facet_count(Role::Admin)
    }

    /// `None` shows every role.
    pub fn set_filter_role(&self, role: Option<Role>) -> bool {
        self.inner.set_filter(role.map_or(Filter::All, Filter::Only))
    }

    pub fn load_users(&self) -> impl Future<Output = Outcome> + Send + 'static {
        self.inner.load()
    }

    pub fn create_user(&self, draft: NewUser) -> impl Future<Output = Outcome> + Send + 'static {
        self.inner.create(draft)
    }
}

impl Deref for UsersStore {
    type Target = EntityStore<User>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
