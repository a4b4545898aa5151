//! # Error Types
//!
//! Domain-specific error types for backoffice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backoffice-core errors (this file)                                    │
//! │  ├── CoreError        - Store operations on records                    │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  backoffice-data errors (separate crate)                               │
//! │  └── DataError        - Mock service failures                          │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── ApiError         - What the shell shows                           │
//! │                                                                         │
//! │  Flow: ValidationError → ApiError → Shell                              │
//! │        CoreError ──────► ApiError → Shell                              │
//! │        DataError ──────► store error field (shown on the page)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by store operations on the in-memory collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A record with this id is not in the collection.
    ///
    /// ## When This Occurs
    /// - `toggle_active` on an id that was never loaded
    /// - `remove` on an id that was already removed
    ///
    /// In both cases the store is left untouched.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl CoreError {
    /// Creates a NotFound error for a record kind and id.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are structural checks on form input before anything reaches a
/// store. They carry the field name so the form can point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below its minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: i64 },

    /// Invalid format (e.g., malformed email, non-numeric price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CoreError::not_found("User", "u9");
        assert_eq!(err.to_string(), "User not found: u9");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "name".to_string(),
            min: 2,
        };
        assert_eq!(err.to_string(), "name must be at least 2 characters");

        let err = ValidationError::BelowMinimum {
            field: "stock".to_string(),
            min: 0,
        };
        assert_eq!(err.to_string(), "stock must be at least 0");
    }
}
