//! # Data Error Types
//!
//! Error types for mock service calls.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  RecordService call (get_all, create, ...)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DataError (this module)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EntityStore ← caught here, stored as the error message                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Shell shows "Error: ... (type `retry`)"                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Mock service errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// No record with this id.
    ///
    /// ## When This Occurs
    /// - `get_by_id` with an id that is not in the seed set
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The service could not be reached or refused the request.
    ///
    /// ## When This Occurs
    /// - Never from the mock services themselves; test doubles and future
    ///   real transports use it to simulate an outage.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl DataError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DataError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for service calls.
pub type DataResult<T> = Result<T, DataError>;
