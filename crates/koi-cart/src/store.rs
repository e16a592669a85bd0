//! # Cart Store
//!
//! Owns the session's cart and writes it through to persistence.
//!
//! ## Store Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Caller                    CartStore                  Persistence       │
//! │  ──────                    ─────────                  ───────────       │
//! │                                                                         │
//! │  open() ──────────────────► load() ◄──────────────── last saved items  │
//! │                                                                         │
//! │  add_item(p) ─────────────► qty += 1 ───────────────► save(items)      │
//! │                                                                         │
//! │  decrement_item(id) ──────► qty -= 1 / drop line ───► save(items)      │
//! │                                                                         │
//! │  remove_item_completely ──► drop line ──────────────► save(items)      │
//! │                                                                         │
//! │  clear_cart() ────────────► items.clear() ──────────► save(items)      │
//! │                                                                         │
//! │  totals / checkout ───────► (read only)                                │
//! │                                                                         │
//! │  NOTE: Mutations take &mut self. Callers serialize access through      │
//! │        ownership; there is no lock inside the store.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A save only happens when the cart actually changed, so no-op calls
//! (decrementing an absent id, clearing an empty cart) never touch storage.
//! Save failures are logged and dropped: the in-memory cart stays
//! authoritative for the rest of the session.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::persistence::CartPersistence;
use koi_core::{encode_shared_cart, Cart, CartTotals, CheckoutTemplate, LineItem, Money, Product};

/// The canonical cart for one application session.
pub struct CartStore {
    cart: Cart,
    persistence: Arc<dyn CartPersistence>,
    checkout: CheckoutTemplate,
}

impl CartStore {
    /// Opens the store and rehydrates the last saved cart.
    ///
    /// If the saved cart can't be read the store starts empty.
    pub async fn open(persistence: Arc<dyn CartPersistence>, checkout: CheckoutTemplate) -> Self {
        let cart = match persistence.load().await {
            Ok(Some(items)) => Cart::from_items(items),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load saved cart, starting empty");
                Cart::new()
            }
        };

        info!(
            lines = cart.line_count(),
            items = cart.total_items(),
            "Cart store opened"
        );

        CartStore {
            cart,
            persistence,
            checkout,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`. Returns the line's new quantity.
    pub async fn add_item(&mut self, product: &Product) -> u32 {
        let quantity = self.cart.add_item(product);
        debug!(product_id = %product.id, quantity, "Item added");
        self.persist().await;
        quantity
    }

    /// Removes one unit of `product_id`, dropping the line at zero.
    ///
    /// Returns false (and does nothing) if the product isn't in the cart.
    pub async fn decrement_item(&mut self, product_id: &str) -> bool {
        if !self.cart.decrement_item(product_id) {
            return false;
        }
        debug!(
            product_id = %product_id,
            quantity = self.cart.quantity_of(product_id),
            "Item decremented"
        );
        self.persist().await;
        true
    }

    /// Same as [`CartStore::decrement_item`].
    pub async fn remove_item(&mut self, product_id: &str) -> bool {
        self.decrement_item(product_id).await
    }

    /// Drops the whole line for `product_id`, whatever its quantity.
    pub async fn remove_item_completely(&mut self, product_id: &str) -> bool {
        if !self.cart.remove_item_completely(product_id) {
            return false;
        }
        debug!(product_id = %product_id, "Line removed");
        self.persist().await;
        true
    }

    /// Empties the cart.
    pub async fn clear_cart(&mut self) -> bool {
        if !self.cart.clear() {
            return false;
        }
        debug!("Cart cleared");
        self.persist().await;
        true
    }

    async fn persist(&self) {
        if let Err(e) = self.persistence.save(self.cart.items()).await {
            warn!(error = %e, lines = self.cart.line_count(), "Failed to save cart");
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    pub fn total_price(&self) -> Money {
        self.cart.total_price()
    }

    /// Total weight in grams.
    pub fn total_weight(&self) -> u64 {
        self.cart.total_weight()
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    // =========================================================================
    // Checkout & Sharing
    // =========================================================================

    /// The order summary, percent-encoded for a messaging deep link.
    pub fn generate_checkout_message(&self) -> String {
        self.checkout.encoded_message(&self.cart)
    }

    /// The full deep link that opens the order summary in the messaging app.
    pub fn checkout_link(&self) -> String {
        self.checkout.link(&self.cart)
    }

    /// The cart as a shared-cart payload another session can import.
    pub fn shared_cart_payload(&self) -> String {
        encode_shared_cart(&self.cart)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CartError, CartResult};
    use crate::persistence::MemoryPersistence;
    use async_trait::async_trait;

    fn product_a() -> Product {
        Product::new("A", "A", 500).with_weight(100)
    }

    fn product_b() -> Product {
        Product::new("B", "B", 300).with_weight(50)
    }

    async fn open_memory() -> (CartStore, Arc<MemoryPersistence>) {
        let persistence = Arc::new(MemoryPersistence::new());
        let store = CartStore::open(persistence.clone(), CheckoutTemplate::default()).await;
        (store, persistence)
    }

    struct BrokenPersistence;

    #[async_trait]
    impl CartPersistence for BrokenPersistence {
        async fn load(&self) -> CartResult<Option<Vec<LineItem>>> {
            Err(CartError::PersistenceFailed("disk unavailable".into()))
        }

        async fn save(&self, _items: &[LineItem]) -> CartResult<()> {
            Err(CartError::PersistenceFailed("disk unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_total_items_counts_every_add() {
        let (mut store, _) = open_memory().await;
        let products = [product_a(), product_b(), Product::new("C", "C", 0)];
        let calls = [3usize, 1, 4];

        for (product, n) in products.iter().zip(calls) {
            for _ in 0..n {
                store.add_item(product).await;
            }
        }

        assert_eq!(store.total_items(), 8);
        assert_eq!(store.cart().quantity_of("C"), 4);
    }

    #[tokio::test]
    async fn test_add_then_decrement_restores_state() {
        let (mut store, _) = open_memory().await;
        store.add_item(&product_a()).await;
        let before = store.cart().clone();

        store.add_item(&product_b()).await;
        assert!(store.decrement_item("B").await);

        assert_eq!(store.cart(), &before);
    }

    #[tokio::test]
    async fn test_remove_completely_then_decrement_is_noop() {
        let (mut store, persistence) = open_memory().await;
        store.add_item(&product_a()).await;
        store.add_item(&product_a()).await;
        store.add_item(&product_b()).await;

        assert!(store.remove_item_completely("A").await);
        let saves = persistence.save_count();

        assert!(!store.decrement_item("A").await);
        assert!(!store.remove_item("A").await);
        assert!(!store.remove_item_completely("A").await);

        assert_eq!(persistence.save_count(), saves);
        assert_eq!(store.cart().line_count(), 1);
    }

    #[tokio::test]
    async fn test_totals_follow_mutations() {
        let (mut store, _) = open_memory().await;
        store.add_item(&product_a()).await;
        store.add_item(&product_b()).await;
        store.add_item(&product_a()).await;
        store.decrement_item("B").await;
        store.add_item(&product_b()).await;

        let expected_price: i64 = store
            .items()
            .iter()
            .map(|i| i.unit_price_cents * i64::from(i.quantity))
            .sum();
        let expected_weight: u64 = store
            .items()
            .iter()
            .map(|i| u64::from(i.weight_grams.unwrap_or(0)) * u64::from(i.quantity))
            .sum();

        assert_eq!(store.total_price().cents(), expected_price);
        assert_eq!(store.total_price().cents(), 1300);
        assert_eq!(store.total_weight(), expected_weight);
        assert_eq!(store.total_weight(), 250);
        assert_eq!(store.totals().total_items, 3);
    }

    #[tokio::test]
    async fn test_every_change_is_saved_and_rehydrated() {
        let (mut store, persistence) = open_memory().await;
        store.add_item(&product_a()).await;
        store.add_item(&product_a()).await;
        store.add_item(&product_b()).await;
        assert_eq!(persistence.save_count(), 3);

        assert!(!CartStore::open(persistence.clone(), CheckoutTemplate::default())
            .await
            .is_empty());

        let reopened = CartStore::open(persistence.clone(), CheckoutTemplate::default()).await;
        assert_eq!(reopened.items(), store.items());

        store.clear_cart().await;
        assert_eq!(persistence.save_count(), 4);
        assert!(!store.clear_cart().await);
        assert_eq!(persistence.save_count(), 4);

        let reopened = CartStore::open(persistence, CheckoutTemplate::default()).await;
        assert!(reopened.is_empty());
    }

    #[tokio::test]
    async fn test_broken_persistence_is_not_fatal() {
        let mut store = CartStore::open(Arc::new(BrokenPersistence), CheckoutTemplate::default()).await;
        assert!(store.is_empty());

        assert_eq!(store.add_item(&product_a()).await, 1);
        assert_eq!(store.add_item(&product_a()).await, 2);
        assert!(store.decrement_item("A").await);
        assert_eq!(store.total_items(), 1);
    }

    #[tokio::test]
    async fn test_checkout_message() {
        let (mut store, _) = open_memory().await;
        store.add_item(&product_a()).await;
        store.add_item(&product_a()).await;
        store.add_item(&product_b()).await;

        let message = store.generate_checkout_message();
        assert!(message.contains("%E2%80%A2%20A%20(2x)%20-%20%2410.00"));
        assert!(message.contains("%E2%80%A2%20B%20(1x)%20-%20%243.00"));
        assert!(message.contains("%2413.00"));
        assert!(message.contains("250g"));
        assert!(!message.contains(' '));
        assert!(!message.contains('\n'));

        assert!(store
            .checkout_link()
            .starts_with("https://wa.me/5354149326?text="));
        assert_eq!(store.shared_cart_payload(), "A,A,B");
    }
}
