//! # Repository Module
//!
//! Mock implementations of [`RecordService`].
//!
//! ## How a Mock Call Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.load()                                                           │
//! │       │                                                                 │
//! │       │  service.get_all().await                                        │
//! │       ▼                                                                 │
//! │  MockService<R>                                                         │
//! │  ├── sleep(latency.get_all)          simulated round trip               │
//! │  └── Ok(seed.clone())                same data every time               │
//! │                                                                         │
//! │  create() echoes the draft back with a fresh UUID and `now`; it does    │
//! │  not add it to the seed set. delete() acknowledges without checking.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MockUserService`] - seed users
//! - [`MockProductService`] - seed products

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use backoffice_core::Record;

use crate::error::{DataError, DataResult};
use crate::latency::{simulate, Latency};
use crate::service::RecordService;

pub mod product;
pub mod user;

pub use product::MockProductService;
pub use user::MockUserService;

/// Generates a new UUID v4 record id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// In-memory service answering from a fixed record list.
#[derive(Debug, Clone)]
pub struct MockService<R> {
    records: Vec<R>,
    latency: Latency,
}

impl<R: Record> MockService<R> {
    /// Creates a service over an arbitrary record list.
    pub fn with_records(records: Vec<R>, latency: Latency) -> Self {
        MockService { records, latency }
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }
}

#[async_trait]
impl<R: Record> RecordService<R> for MockService<R> {
    async fn get_all(&self) -> DataResult<Vec<R>> {
        debug!(kind = R::KIND, "GET all");
        simulate(self.latency.get_all).await;
        Ok(self.records.clone())
    }

    async fn get_by_id(&self, id: &str) -> DataResult<R> {
        debug!(kind = R::KIND, id = %id, "GET by id");
        simulate(self.latency.get_by_id).await;
        self.records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| DataError::not_found(R::KIND, id))
    }

    async fn create(&self, draft: R::Draft) -> DataResult<R> {
        simulate(self.latency.create).await;
        let record = R::from_draft(draft, generate_id(), Utc::now());
        debug!(kind = R::KIND, id = %record.id(), "Created");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> DataResult<()> {
        debug!(kind = R::KIND, id = %id, "DELETE");
        simulate(self.latency.delete).await;
        Ok(())
    }
}
