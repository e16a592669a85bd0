//! # Shared-Cart Payload
//!
//! Encodes a cart as the list of product ids carried by a share link, and
//! decodes such a list back.
//!
//! ```text
//!   Cart {A: 2, B: 1}  ──encode──►  "A,A,B"  ──decode──►  ["A", "A", "B"]
//! ```
//!
//! Each id appears once per unit, so importing the decoded list into an
//! empty cart (one `add_item` per id) reproduces the original quantities.
//! Prices are deliberately not part of the payload: the importing side looks
//! every product up again.

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::validation::validate_product_id;
use crate::MAX_SHARED_IDS;

/// Separator between ids in a shared payload.
pub const SHARE_SEPARATOR: char = ',';

/// Encodes the cart as a comma-separated id list, one entry per unit.
pub fn encode_shared_cart(cart: &Cart) -> String {
    cart.items()
        .iter()
        .flat_map(|item| std::iter::repeat(item.product_id.as_str()).take(item.quantity as usize))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes a shared payload into product ids, preserving order.
///
/// Blank entries and ids that fail validation are dropped. A payload with
/// more than [`MAX_SHARED_IDS`] usable ids is rejected.
pub fn decode_shared_cart(raw: &str) -> CoreResult<Vec<String>> {
    let ids: Vec<String> = raw
        .split(SHARE_SEPARATOR)
        .map(str::trim)
        .filter(|id| validate_product_id(id).is_ok())
        .map(str::to_string)
        .collect();

    if ids.len() > MAX_SHARED_IDS {
        return Err(CoreError::SharedCartTooLarge {
            found: ids.len(),
            max: MAX_SHARED_IDS,
        });
    }

    Ok(ids)
}

// =============================================================================
// Unit Tests
// =============================================================================
