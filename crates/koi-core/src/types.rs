//! # Domain Types
//!
//! The product record the cart is built from.
//!
//! ```text
//! ┌─────────────────┐   add_item()   ┌─────────────────┐
//! │    Product      │ ─────────────► │    LineItem     │
//! │  ─────────────  │   (snapshot)   │  ─────────────  │
//! │  id             │                │  product_id     │
//! │  name           │                │  name           │
//! │  price_cents    │                │  unit_price     │
//! │  weight_grams?  │                │  weight_grams?  │
//! └─────────────────┘                │  quantity ≥ 1   │
//!                                    └─────────────────┘
//! ```
//!
//! Products are owned by the catalog (see `koi-db`). The cart only ever reads
//! them, at the moment an item is added.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Opaque unique identifier.
    pub id: String,

    /// Display name used in the cart and the checkout message.
    pub name: String,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Unit weight in grams. `None` counts as 0 in weight totals.
    #[serde(default)]
    pub weight_grams: Option<u32>,
}

impl Product {
    /// Creates a product without a weight.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price_cents,
            weight_grams: None,
        }
    }

    /// Sets the unit weight in grams.
    pub fn with_weight(mut self, grams: u32) -> Self {
        self.weight_grams = Some(grams);
        self
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Unit weight with a missing weight treated as zero.
    #[inline]
    pub fn weight_or_zero(&self) -> u32 {
        self.weight_grams.unwrap_or(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
