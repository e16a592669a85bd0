//! # Cart
//!
//! The cart as an ordered list of line items, plus the totals derived from it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation                  Existing line?        Effect                │
//! │  ─────────                  ──────────────        ──────                │
//! │                                                                         │
//! │  add_item(product) ───────► yes ───────────────► quantity += 1          │
//! │                     └─────► no  ───────────────► push(snapshot, qty 1)  │
//! │                                                                         │
//! │  decrement_item(id) ──────► qty > 1 ───────────► quantity -= 1          │
//! │                     ├─────► qty == 1 ──────────► remove line            │
//! │                     └─────► absent ────────────► no-op                  │
//! │                                                                         │
//! │  remove_item_completely ──► present ───────────► remove line            │
//! │                     └─────► absent ────────────► no-op                  │
//! │                                                                         │
//! │  clear() ──────────────────────────────────────► items.clear()          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every line has quantity ≥ 1; a line that would reach 0 is removed
//! - Lines keep the order in which their product was first added
//! - Totals are computed from the lines on every read, never cached

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in the cart.
///
/// ## Price Snapshot
/// Name, price and weight are copied from the [`Product`] when the line is
/// first created. Later catalog changes are not reflected here; adding the
/// same product again only bumps the quantity and keeps the original
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Product identifier (unique within a cart).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Unit weight in grams at time of adding (frozen).
    #[serde(default)]
    pub weight_grams: Option<u32>,

    /// Quantity in cart, always ≥ 1.
    pub quantity: u32,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line for a product with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            weight_grams: product.weight_grams,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Line weight in grams (unit weight × quantity, missing weight = 0).
    #[inline]
    pub fn line_weight(&self) -> u64 {
        u64::from(self.weight_grams.unwrap_or(0)) * u64::from(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from a previously persisted line sequence.
    ///
    /// Valid input is reproduced exactly. Lines with quantity 0 are dropped
    /// and a repeated product id is folded into its first line, so a damaged
    /// payload still yields a cart that upholds the invariants.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items.into_iter().filter(|i| i.quantity > 0) {
            match cart.position(&item.product_id) {
                Some(index) => {
                    let line = &mut cart.items[index];
                    line.quantity = line.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - If product already in cart: quantity += 1 (snapshot unchanged)
    /// - If product not in cart: appends a new line with quantity 1
    ///
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }

        self.items.push(LineItem::from_product(product));
        1
    }

    /// Removes one unit of a product.
    ///
    /// Returns `true` if the cart changed; an absent id is a no-op.
    pub fn decrement_item(&mut self, product_id: &str) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };

        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
        } else {
            self.items.remove(index);
        }
        true
    }

    /// Same as [`Cart::decrement_item`].
    #[inline]
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        self.decrement_item(product_id)
    }

    /// Removes a product's line regardless of quantity.
    ///
    /// Returns `true` if a line was removed.
    pub fn remove_item_completely(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    ///
    /// Returns `true` if the cart had any items.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// The lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up the line for a product.
    pub fn get(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Quantity of a product, 0 when absent.
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.get(product_id).map_or(0, |i| i.quantity)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of quantity × unit price.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantity × unit weight in grams.
    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(LineItem::line_weight).sum()
    }

    /// All derived values at once.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_items: u64,
    pub total_price_cents: i64,
    pub total_weight_grams: u64,
}

impl CartTotals {
    /// Returns the total price as Money.
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_items: cart.total_items(),
            total_price_cents: cart.total_price().cents(),
            total_weight_grams: cart.total_weight(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
