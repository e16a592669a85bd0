//! # Cart Repository
//!
//! Key-value storage for the cart's line items.
//!
//! Each key holds the complete line sequence as a JSON array. A save
//! replaces the previous payload wholesale, so a load always returns
//! exactly what the last save wrote.
//!
//! ```text
//! cart_state
//! ┌──────────┬──────────────────────────────────────────────┬─────────────┐
//! │ key (PK) │ payload                                      │ updated_at  │
//! ├──────────┼──────────────────────────────────────────────┼─────────────┤
//! │ "cart"   │ [{"productId":"A","quantity":2,...}, ...]    │ 2026-...    │
//! └──────────┴──────────────────────────────────────────────┴─────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use koi_core::LineItem;

/// Repository for persisted cart state.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads the line items stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Some(items))` - A cart was saved under this key
    /// * `Ok(None)` - Nothing saved yet
    /// * `Err(DbError::CorruptData)` - Payload is not a valid line item array
    pub async fn load(&self, key: &str) -> DbResult<Option<Vec<LineItem>>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_state WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let items: Vec<LineItem> = serde_json::from_str(&payload)
            .map_err(|e| DbError::corrupt("cart_state", format!("{key}: {e}")))?;

        debug!(key = %key, lines = items.len(), "Cart payload loaded");
        Ok(Some(items))
    }

    /// Saves the full line sequence under `key`, replacing any previous payload.
    pub async fn save(&self, key: &str, items: &[LineItem]) -> DbResult<()> {
        let payload = serde_json::to_string(items)?;

        sqlx::query(
            r#"
            INSERT INTO cart_state (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, lines = items.len(), "Cart payload saved");
        Ok(())
    }

    /// Deletes the payload stored under `key`. Missing keys are ignored.
    pub async fn delete(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM cart_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
