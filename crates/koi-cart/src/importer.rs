//! # Shared-Cart Importer
//!
//! Turns a shared link's product ids into cart items, asking the user how to
//! reconcile them with a non-empty local cart.
//!
//! ## Decision Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    handle_shared_cart(ids)                              │
//! │                                                                         │
//! │  ids empty? ──yes──► NothingToImport (no prompt, no mutation)          │
//! │      │no                                                                │
//! │      ▼                                                                  │
//! │  cart empty? ──yes──► IMPORTING ──────────────────────────► DONE       │
//! │      │no                                                                │
//! │      ▼                                                                  │
//! │  AWAITING_CHOICE (prompt, no timeout, store held &mut)                 │
//! │      ├── Merge ───► IMPORTING ────────────────────────────► DONE       │
//! │      ├── Replace ─► CLEARING ──► IMPORTING ───────────────► DONE       │
//! │      └── Cancel ──────────────────────────────────────────► DONE       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fan-out
//! IMPORTING looks every id up concurrently (bounded by
//! `max_concurrent_lookups`) and waits for all of them to settle. Results
//! are then applied in the order of `ids`, whatever order the lookups
//! finished in. A missing product or a failed lookup skips that id; nothing
//! is retried and nothing is rolled back.

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::CartResult;
use crate::lookup::ProductLookup;
use crate::prompt::{ImportChoice, SharedCartPrompt};
use crate::store::CartStore;
use koi_core::decode_shared_cart;

/// Default bound on concurrent lookups.
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

// =============================================================================
// Outcome Types
// =============================================================================

/// What happened to each id of one import.
///
/// Informational only: a partially resolved import is still a success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Ids handed to the import.
    pub requested: usize,

    /// Ids that resolved and were added to the cart.
    pub added: usize,

    /// Ids with no matching product.
    pub not_found: usize,

    /// Ids whose lookup failed.
    pub failed: usize,
}

impl ImportReport {
    /// Ids that were skipped for any reason.
    pub fn skipped(&self) -> usize {
        self.not_found + self.failed
    }
}

/// Result of one [`SharedCartImporter::handle_shared_cart`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedCartOutcome {
    /// The link carried no ids. Nothing was asked, nothing changed.
    NothingToImport,

    /// Items were imported. `choice` is `None` when the local cart was empty
    /// and no prompt was needed.
    Imported {
        choice: Option<ImportChoice>,
        report: ImportReport,
    },

    /// The user cancelled. The cart is unchanged.
    Cancelled,
}

enum Resolution {
    Found(koi_core::Product),
    Missing,
    Failed,
}

// =============================================================================
// Importer
// =============================================================================

/// Resolves shared-cart ids and applies them to a [`CartStore`].
pub struct SharedCartImporter<L, P> {
    lookup: L,
    prompt: P,
    max_concurrent_lookups: usize,
}

impl<L, P> SharedCartImporter<L, P>
where
    L: ProductLookup,
    P: SharedCartPrompt,
{
    pub fn new(lookup: L, prompt: P) -> Self {
        SharedCartImporter {
            lookup,
            prompt,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }

    /// Sets the lookup concurrency bound (at least 1).
    pub fn max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    /// Looks up every id and adds the products that exist, in `ids` order.
    ///
    /// Ids are opaque here and go to the lookup as given. Never fails: ids
    /// that can't be resolved are skipped and counted.
    pub async fn import_items(&self, store: &mut CartStore, ids: &[String]) -> ImportReport {
        let mut report = ImportReport {
            requested: ids.len(),
            ..Default::default()
        };

        let resolutions: Vec<(&str, Resolution)> = stream::iter(ids.iter())
            .map(|id| async move { (id.as_str(), self.resolve(id).await) })
            .buffered(self.max_concurrent_lookups)
            .collect()
            .await;

        for (id, resolution) in resolutions {
            match resolution {
                Resolution::Found(product) => {
                    store.add_item(&product).await;
                    report.added += 1;
                }
                Resolution::Missing => {
                    debug!(product_id = %id, "Shared product not found, skipping");
                    report.not_found += 1;
                }
                Resolution::Failed => report.failed += 1,
            }
        }

        info!(
            requested = report.requested,
            added = report.added,
            not_found = report.not_found,
            failed = report.failed,
            "Shared items imported"
        );
        report
    }

    async fn resolve(&self, id: &str) -> Resolution {
        match self.lookup.fetch_product(id).await {
            Ok(Some(product)) => Resolution::Found(product),
            Ok(None) => Resolution::Missing,
            Err(e) => {
                warn!(product_id = %id, error = %e, "Product lookup failed, skipping");
                Resolution::Failed
            }
        }
    }

    /// Imports a shared cart, prompting first if the local cart has items.
    ///
    /// The store stays mutably borrowed while the prompt is pending, so no
    /// other mutation can slip in between the question and the answer.
    pub async fn handle_shared_cart(
        &self,
        store: &mut CartStore,
        ids: &[String],
    ) -> SharedCartOutcome {
        if ids.is_empty() {
            debug!("Shared cart is empty, nothing to import");
            return SharedCartOutcome::NothingToImport;
        }

        if store.is_empty() {
            let report = self.import_items(store, ids).await;
            return SharedCartOutcome::Imported {
                choice: None,
                report,
            };
        }

        let choice = self.prompt.choose(&store.totals(), ids.len()).await;
        info!(%choice, incoming = ids.len(), "Shared cart choice made");

        match choice {
            ImportChoice::Merge => {}
            ImportChoice::Replace => {
                store.clear_cart().await;
            }
            ImportChoice::Cancel => return SharedCartOutcome::Cancelled,
        }

        let report = self.import_items(store, ids).await;
        SharedCartOutcome::Imported {
            choice: Some(choice),
            report,
        }
    }

    /// Decodes a raw shared-cart payload, then runs [`Self::handle_shared_cart`].
    ///
    /// Fails only when the payload is rejected outright (too many ids).
    pub async fn handle_shared_link(
        &self,
        store: &mut CartStore,
        payload: &str,
    ) -> CartResult<SharedCartOutcome> {
        let ids = decode_shared_cart(payload)?;
        Ok(self.handle_shared_cart(store, &ids).await)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CartError;
    use crate::persistence::MemoryPersistence;
    use async_trait::async_trait;
    use koi_core::{CartTotals, CheckoutTemplate, CoreError, Product};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // -------------------------------------------------------------------------
    // Fakes
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct FakeCatalog {
        products: HashMap<String, Product>,
        broken: Vec<String>,
        delays_ms: HashMap<String, u64>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn with(mut self, product: Product) -> Self {
            self.products.insert(product.id.clone(), product);
            self
        }

        fn broken(mut self, id: &str) -> Self {
            self.broken.push(id.to_string());
            self
        }

        fn delay(mut self, id: &str, ms: u64) -> Self {
            self.delays_ms.insert(id.to_string(), ms);
            self
        }
    }

    #[async_trait]
    impl ProductLookup for FakeCatalog {
        async fn fetch_product(&self, id: &str) -> CartResult<Option<Product>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(ms) = self.delays_ms.get(id) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.broken.iter().any(|b| b == id) {
                return Err(CartError::LookupFailed {
                    id: id.to_string(),
                    reason: "backend unavailable".into(),
                });
            }
            Ok(self.products.get(id).cloned())
        }
    }

    struct FakePrompt {
        answer: ImportChoice,
        asked: Mutex<Vec<(CartTotals, usize)>>,
    }

    impl FakePrompt {
        fn answering(answer: ImportChoice) -> Arc<Self> {
            Arc::new(FakePrompt {
                answer,
                asked: Mutex::new(Vec::new()),
            })
        }

        fn times_asked(&self) -> usize {
            self.asked.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SharedCartPrompt for FakePrompt {
        async fn choose(&self, current: &CartTotals, incoming: usize) -> ImportChoice {
            self.asked.lock().unwrap().push((*current, incoming));
            self.answer
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn product_a() -> Product {
        Product::new("A", "A", 500).with_weight(100)
    }

    fn product_b() -> Product {
        Product::new("B", "B", 300).with_weight(50)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn empty_store() -> CartStore {
        CartStore::open(Arc::new(MemoryPersistence::new()), CheckoutTemplate::default()).await
    }

    /// Local cart {A: 2 @ 5.00, 100g}.
    async fn store_with_two_a() -> CartStore {
        let mut store = empty_store().await;
        store.add_item(&product_a()).await;
        store.add_item(&product_a()).await;
        store
    }

    /// A is unresolvable (lookup fails), B resolves.
    fn catalog_b_only() -> Arc<FakeCatalog> {
        Arc::new(FakeCatalog::default().with(product_b()).broken("A"))
    }

    fn quantities(store: &CartStore) -> Vec<(String, u32)> {
        store
            .items()
            .iter()
            .map(|i| (i.product_id.clone(), i.quantity))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Decision protocol
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_merge_keeps_existing_and_skips_failures() {
        let prompt = FakePrompt::answering(ImportChoice::Merge);
        let importer = SharedCartImporter::new(catalog_b_only(), prompt.clone());
        let mut store = store_with_two_a().await;

        let outcome = importer.handle_shared_cart(&mut store, &ids(&["A", "B"])).await;

        assert_eq!(
            quantities(&store),
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
        assert_eq!(store.total_price().cents(), 1300);
        assert_eq!(store.total_weight(), 250);

        assert_eq!(prompt.times_asked(), 1);
        let (current, incoming) = prompt.asked.lock().unwrap()[0];
        assert_eq!(current.total_items, 2);
        assert_eq!(incoming, 2);

        assert_eq!(
            outcome,
            SharedCartOutcome::Imported {
                choice: Some(ImportChoice::Merge),
                report: ImportReport {
                    requested: 2,
                    added: 1,
                    not_found: 0,
                    failed: 1,
                },
            }
        );
    }

    #[tokio::test]
    async fn test_replace_discards_existing() {
        let prompt = FakePrompt::answering(ImportChoice::Replace);
        let importer = SharedCartImporter::new(catalog_b_only(), prompt.clone());
        let mut store = store_with_two_a().await;

        importer.handle_shared_cart(&mut store, &ids(&["B"])).await;

        assert_eq!(quantities(&store), vec![("B".to_string(), 1)]);
        assert_eq!(prompt.times_asked(), 1);
    }

    #[tokio::test]
    async fn test_cancel_leaves_cart_unchanged() {
        let catalog = catalog_b_only();
        let prompt = FakePrompt::answering(ImportChoice::Cancel);
        let importer = SharedCartImporter::new(catalog.clone(), prompt.clone());
        let mut store = store_with_two_a().await;
        let before = store.cart().clone();

        let outcome = importer.handle_shared_cart(&mut store, &ids(&["A", "B"])).await;

        assert_eq!(outcome, SharedCartOutcome::Cancelled);
        assert_eq!(store.cart(), &before);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_ids_never_prompt_or_mutate() {
        let prompt = FakePrompt::answering(ImportChoice::Replace);
        let importer = SharedCartImporter::new(catalog_b_only(), prompt.clone());

        let mut store = store_with_two_a().await;
        let before = store.cart().clone();
        let outcome = importer.handle_shared_cart(&mut store, &[]).await;
        assert_eq!(outcome, SharedCartOutcome::NothingToImport);
        assert_eq!(store.cart(), &before);

        let mut empty = empty_store().await;
        let outcome = importer.handle_shared_cart(&mut empty, &[]).await;
        assert_eq!(outcome, SharedCartOutcome::NothingToImport);
        assert!(empty.is_empty());

        assert_eq!(prompt.times_asked(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_imports_without_prompt() {
        let prompt = FakePrompt::answering(ImportChoice::Cancel);
        let catalog = Arc::new(FakeCatalog::default().with(product_a()).with(product_b()));
        let importer = SharedCartImporter::new(catalog, prompt.clone());
        let mut store = empty_store().await;

        let outcome = importer
            .handle_shared_cart(&mut store, &ids(&["A", "B", "A"]))
            .await;

        assert_eq!(prompt.times_asked(), 0);
        assert!(matches!(
            outcome,
            SharedCartOutcome::Imported { choice: None, report } if report.added == 3
        ));
        assert_eq!(
            quantities(&store),
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
    }

    // -------------------------------------------------------------------------
    // import_items
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let catalog = Arc::new(FakeCatalog::default().with(product_b()));
        let importer =
            SharedCartImporter::new(catalog.clone(), FakePrompt::answering(ImportChoice::Merge));
        let mut store = empty_store().await;

        let report = importer
            .import_items(&mut store, &ids(&["Z", "B", "", "bad id"]))
            .await;

        assert_eq!(report.added, 1);
        assert_eq!(report.not_found, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(report.skipped(), 3);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_unusual_ids_are_looked_up_as_given() {
        let long_id = "x".repeat(65);
        let catalog = Arc::new(
            FakeCatalog::default()
                .with(Product::new(long_id.as_str(), "Long", 100))
                .with(Product::new("green tea", "Green Tea", 500)),
        );
        let importer =
            SharedCartImporter::new(catalog.clone(), FakePrompt::answering(ImportChoice::Merge));
        let mut store = empty_store().await;

        let report = importer
            .import_items(&mut store, &[long_id.clone(), "green tea".to_string()])
            .await;

        assert_eq!(report.added, 2);
        assert_eq!(report.not_found, 0);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            quantities(&store),
            vec![(long_id, 1), ("green tea".to_string(), 1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_applied_in_id_order() {
        let catalog = Arc::new(
            FakeCatalog::default()
                .with(product_a())
                .with(product_b())
                .with(Product::new("C", "C", 100))
                .delay("A", 30)
                .delay("B", 20)
                .delay("C", 10),
        );
        let importer =
            SharedCartImporter::new(catalog.clone(), FakePrompt::answering(ImportChoice::Merge));
        let mut store = empty_store().await;

        importer.import_items(&mut store, &ids(&["A", "B", "C"])).await;

        let order: Vec<&str> = store.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(catalog.peak_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let mut catalog = FakeCatalog::default();
        let mut list = Vec::new();
        for n in 0..10 {
            let id = format!("P{n}");
            catalog = catalog.with(Product::new(id.as_str(), "Tea", 100)).delay(&id, 5);
            list.push(id);
        }
        let catalog = Arc::new(catalog);
        let importer =
            SharedCartImporter::new(catalog.clone(), FakePrompt::answering(ImportChoice::Merge))
                .max_concurrent_lookups(3);
        let mut store = empty_store().await;

        let report = importer.import_items(&mut store, &list).await;

        assert_eq!(report.added, 10);
        assert_eq!(catalog.peak_in_flight.load(Ordering::SeqCst), 3);
    }

    // -------------------------------------------------------------------------
    // Shared links
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_shared_link_roundtrip_reproduces_quantities() {
        let catalog = Arc::new(FakeCatalog::default().with(product_a()).with(product_b()));
        let importer = SharedCartImporter::new(catalog, FakePrompt::answering(ImportChoice::Merge));

        let mut sender = store_with_two_a().await;
        sender.add_item(&product_b()).await;
        let payload = sender.shared_cart_payload();

        let mut receiver = empty_store().await;
        importer
            .handle_shared_link(&mut receiver, &payload)
            .await
            .unwrap();

        assert_eq!(quantities(&receiver), quantities(&sender));
    }

    #[tokio::test]
    async fn test_oversized_link_is_rejected() {
        let importer = SharedCartImporter::new(
            catalog_b_only(),
            FakePrompt::answering(ImportChoice::Merge),
        );
        let mut store = empty_store().await;
        let payload = vec!["B"; koi_core::MAX_SHARED_IDS + 1].join(",");

        let err = importer
            .handle_shared_link(&mut store, &payload)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CartError::Core(CoreError::SharedCartTooLarge { .. })
        ));
        assert!(store.is_empty());
    }
}
