//! # Cart Service Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Service Error Categories                       │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Lookup      │  │      Persistence        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  LookupFailed   │  │  PersistenceFailed      │ │
//! │  │  ConfigLoad     │  │  (skipped by    │  │  (logged and discarded  │ │
//! │  │  ConfigSave     │  │   the importer) │  │   by the store)         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these ever abort a cart operation. They surface from the
//! collaborators and from configuration loading; the store and importer
//! absorb them.

use koi_core::CoreError;
use koi_db::DbError;
use thiserror::Error;

/// Result type alias for cart service operations.
pub type CartResult<T> = Result<T, CartError>;

/// Cart service error type.
#[derive(Debug, Error)]
pub enum CartError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid cart configuration.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// Product lookup backend failed (not the same as "no such product").
    #[error("Product lookup failed for {id}: {reason}")]
    LookupFailed { id: String, reason: String },

    /// Persistence backend failed to load or save the cart.
    #[error("Cart persistence failed: {0}")]
    PersistenceFailed(String),

    /// Shared-cart payload rejected.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying database error.
    #[error(transparent)]
    Db(#[from] DbError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CartError {
    fn from(err: toml::ser::Error) -> Self {
        CartError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::PersistenceFailed(err.to_string())
    }
}

impl CartError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CartError::InvalidConfig(_)
                | CartError::ConfigLoadFailed(_)
                | CartError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failed_message() {
        let err = CartError::LookupFailed {
            id: "A".into(),
            reason: "timeout".into(),
        };
        assert_eq!(err.to_string(), "Product lookup failed for A: timeout");
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_db_error_is_transparent() {
        let err: CartError = DbError::not_found("Product", "A").into();
        assert_eq!(err.to_string(), "Product not found: A");
    }

    #[test]
    fn test_config_categorization() {
        assert!(CartError::InvalidConfig("x".into()).is_config_error());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(CartError::from(io).is_config_error());
    }
}
