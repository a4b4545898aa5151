//! # User Service
//!
//! Mock `/users` endpoint backed by [`seed::users`](crate::seed::users).

use backoffice_core::User;

use super::MockService;
use crate::latency::Latency;
use crate::seed;

/// Mock user service.
///
/// ## Usage
/// ```rust,ignore
/// let service = MockUserService::new(Latency::default());
/// let users = service.get_all().await?;   // after ~1s
/// let sarah = service.get_by_id("u1").await?;
/// ```
pub type MockUserService = MockService<User>;

impl MockService<User> {
    /// Creates the service over the seed users.
    pub fn new(latency: Latency) -> Self {
        MockService::with_records(seed::users(), latency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::service::RecordService;
    use backoffice_core::{NewUser, Role};
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_get_all_waits_one_second() {
        let service = MockUserService::new(Latency::default());
        let start = Instant::now();
        let users = service.get_all().await.unwrap();
        assert_eq!(users.len(), 5);
        assert_eq!(users[0].name, "Sarah Connor");
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let service = MockUserService::new(Latency::none());
        let user = service.get_by_id("u3").await.unwrap();
        assert_eq!(user.name, "Miles Dyson");
        assert!(!user.active);

        let err = service.get_by_id("u99").await.unwrap_err();
        assert_eq!(err, DataError::not_found("User", "u99"));
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let service = MockUserService::new(Latency::none());
        let draft = NewUser {
            name: "Ann Lee".to_string(),
            email: "ann@example.com".to_string(),
            role: Role::Viewer,
            active: true,
        };
        let a = service.create(draft.clone()).await.unwrap();
        let b = service.create(draft).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Ann Lee");
        assert_eq!(a.role, Role::Viewer);

        // Created records are echoed, never added to the seed set.
        assert_eq!(service.get_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_acknowledges_unknown_id() {
        let service = MockUserService::new(Latency::none());
        assert!(service.delete("nobody").await.is_ok());
    }
}
