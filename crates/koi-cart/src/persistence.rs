//! # Cart Persistence
//!
//! Durable storage for the cart's line item sequence.
//!
//! ```text
//! CartStore ──save(items)──► CartPersistence ──► SqlitePersistence ──► cart_state
//!           ◄──load()──────                  └─► MemoryPersistence (tests)
//! ```
//!
//! A backend stores the full sequence on every save. Loading returns exactly
//! what was last saved, or `None` when nothing has been saved yet.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::CartResult;
use koi_core::LineItem;
use koi_db::CartRepository;

/// Storage backend for the cart.
#[async_trait]
pub trait CartPersistence: Send + Sync {
    /// Reads the last saved line sequence.
    async fn load(&self) -> CartResult<Option<Vec<LineItem>>>;

    /// Replaces the stored line sequence.
    async fn save(&self, items: &[LineItem]) -> CartResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// Stores the cart in the `cart_state` table under a fixed key.
#[derive(Debug, Clone)]
pub struct SqlitePersistence {
    repo: CartRepository,
    key: String,
}

impl SqlitePersistence {
    pub fn new(repo: CartRepository, key: impl Into<String>) -> Self {
        SqlitePersistence {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl CartPersistence for SqlitePersistence {
    async fn load(&self) -> CartResult<Option<Vec<LineItem>>> {
        Ok(self.repo.load(&self.key).await?)
    }

    async fn save(&self, items: &[LineItem]) -> CartResult<()> {
        Ok(self.repo.save(&self.key, items).await?)
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Keeps the serialized cart in memory.
///
/// The payload goes through the same JSON encoding as the SQLite backend so
/// a round trip behaves identically.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    payload: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The stored JSON payload, if any.
    pub async fn payload(&self) -> Option<String> {
        self.payload.lock().await.clone()
    }
}

#[async_trait]
impl CartPersistence for MemoryPersistence {
    async fn load(&self) -> CartResult<Option<Vec<LineItem>>> {
        let payload = self.payload.lock().await;
        match payload.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, items: &[LineItem]) -> CartResult<()> {
        let json = serde_json::to_string(items)?;
        *self.payload.lock().await = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
