//! # Error Types
//!
//! Domain-specific error types for koi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  koi-core errors (this file)                                           │
//! │  ├── CoreError        - Domain errors (shared-cart payloads)           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  koi-db errors (separate crate)                                        │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  koi-cart errors (separate crate)                                      │
//! │  └── CartError        - Config, lookup and persistence failures        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CartError               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart mutations themselves never fail: decrementing or removing an absent
//! product is a no-op, not an error.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A shared-cart payload carries more identifiers than allowed.
    ///
    /// ## When This Occurs
    /// - A hand-crafted or corrupted link with thousands of ids
    #[error("Shared cart has {found} items, maximum is {max}")]
    SharedCartTooLarge { found: usize, max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. control characters in an identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
