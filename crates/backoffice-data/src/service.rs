//! # Record Service Trait
//!
//! The remote API surface a store talks to. One trait serves both record
//! types; stores hold it as `Arc<dyn RecordService<R>>` so tests can swap in
//! their own implementation.
//!
//! ```text
//!   EntityStore<User>  ──► Arc<dyn RecordService<User>>     ──► MockUserService
//!   EntityStore<Product> ► Arc<dyn RecordService<Product>>  ──► MockProductService
//! ```

use async_trait::async_trait;

use backoffice_core::Record;

use crate::error::DataResult;

/// Async CRUD over one record type.
#[async_trait]
pub trait RecordService<R: Record>: Send + Sync {
    /// Every record, in the service's order.
    async fn get_all(&self) -> DataResult<Vec<R>>;

    /// One record by id.
    async fn get_by_id(&self, id: &str) -> DataResult<R>;

    /// Creates a record from a draft. The service assigns id and timestamp.
    async fn create(&self, draft: R::Draft) -> DataResult<R>;

    /// Deletes a record by id.
    async fn delete(&self, id: &str) -> DataResult<()>;
}
