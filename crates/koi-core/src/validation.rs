//! # Validation Module
//!
//! Input validation for product records and identifiers.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Shared link payload ──► decode_shared_cart() ──► validate_product_id  │
//! │                                                                         │
//! │  Catalog insert/update ──► ProductRepository ──► validate_product      │
//! │                                                                         │
//! │  SQLite CHECK constraints catch what slips through                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use koi_core::validation::{validate_product, validate_product_id};
//! use koi_core::Product;
//!
//! assert!(validate_product_id("tea-01").is_ok());
//! assert!(validate_product_id("").is_err());
//! assert!(validate_product(&Product::new("tea-01", "Green Tea", 500)).is_ok());
//! ```

use crate::error::ValidationError;
use crate::share::SHARE_SEPARATOR;
use crate::types::Product;
use crate::MAX_PRODUCT_ID_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a product display name.
const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_PRODUCT_ID_LEN`] characters
/// - No whitespace, control characters or the share separator (`,`)
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.chars().count() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if let Some(c) = id
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || *c == SHARE_SEPARATOR)
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: format!("unexpected character {:?}", c),
        });
    }

    Ok(())
}

/// Validates a product display name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a full product record before it enters the catalog.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_id(&product.id)?;
    validate_product_name(&product.name)?;

    if product.price().is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price_cents".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("A").is_ok());
        assert!(validate_product_id("550e8400-e29b-41d4-a716-446655440000").is_ok());

        assert!(matches!(
            validate_product_id(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_product_id(&"x".repeat(MAX_PRODUCT_ID_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(validate_product_id("a b").is_err());
        assert!(validate_product_id("a,b").is_err());
        assert!(validate_product_id("a\nb").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Green Tea").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"n".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&Product::new("A", "A", 0)).is_ok());

        let err = validate_product(&Product::new("A", "A", -1)).unwrap_err();
        assert!(matches!(err, ValidationError::MustNotBeNegative { .. }));

        assert!(validate_product(&Product::new("", "A", 100)).is_err());
        assert!(validate_product(&Product::new("A", "", 100)).is_err());
    }
}
