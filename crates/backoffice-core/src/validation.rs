//! # Validation Module
//!
//! Structural constraints on form input, checked before anything reaches a
//! store.
//!
//! ## Where It Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add name=Ann email=ann@x.io role=admin                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  forms::parse_user (console)                                            │
//! │       │  validate_name / validate_email  ← THIS MODULE                  │
//! │       │                                                                 │
//! │       ├── Err → message back to the user, store untouched               │
//! │       └── Ok(NewUser) → UsersStore::create                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use backoffice_core::validation::{validate_email, validate_name};
//!
//! assert!(validate_name("name", "Ann").is_ok());
//! assert!(validate_email("ann@example.com").is_ok());
//! assert!(validate_email("ann").is_err());
//! ```

use crate::error::ValidationError;
use crate::MIN_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_TEXT_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value. Returns it trimmed.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a user or product name.
///
/// ## Rules
/// - Must not be blank
/// - At least 2 characters after trimming
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = validate_required(field, name)?;

    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: MIN_NAME_LEN,
        });
    }

    Ok(name)
}

/// Validates an email address.
///
/// Only the shape is checked: one `@`, a non-empty local part, and a domain
/// containing a dot with text on both sides.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = validate_required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(email),
        _ => Err(invalid()),
    }
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no text filter)
/// - Maximum 100 characters
///
/// The query is returned as typed; trimming happens at match time.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    if query.trim().chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::BelowMinimum {
            field: "price".to_string(),
            min: 0,
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::BelowMinimum {
            field: "stock".to_string(),
            min: 0,
        });
    }

    Ok(())
}

/// Parses a decimal price such as `19.99` or `5` into cents.
///
/// At most two decimal places. A leading `-` parses, so the caller's
/// [`validate_price_cents`] is what rejects negatives.
pub fn parse_price_cents(input: &str) -> ValidationResult<i64> {
    let input = input.trim();
    let invalid = || ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a number with at most two decimals".to_string(),
    };

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > 2 || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(invalid)?;
    Ok(if negative { -cents } else { cents })
}

// =============================================================================
// Unit Tests
// =============================================================================
