//! # Product Lookup
//!
//! Resolves shared-cart identifiers to catalog products.
//!
//! `Ok(None)` means the product does not exist (or is no longer sold).
//! `Err` means the backend could not answer. The importer skips both, but
//! logs and counts them separately.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CartError, CartResult};
use koi_core::Product;
use koi_db::ProductRepository;

/// Source of product records for the importer.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn fetch_product(&self, id: &str) -> CartResult<Option<Product>>;
}

#[async_trait]
impl<T: ProductLookup + ?Sized> ProductLookup for Arc<T> {
    async fn fetch_product(&self, id: &str) -> CartResult<Option<Product>> {
        (**self).fetch_product(id).await
    }
}

#[async_trait]
impl ProductLookup for ProductRepository {
    async fn fetch_product(&self, id: &str) -> CartResult<Option<Product>> {
        self.get_by_id(id).await.map_err(|e| CartError::LookupFailed {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use koi_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_repository_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        repo.insert(&Product::new("B", "Bancha", 300).with_weight(50))
            .await
            .unwrap();

        let found = repo.fetch_product("B").await.unwrap().unwrap();
        assert_eq!(found.price_cents, 300);
        assert_eq!(repo.fetch_product("A").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_backend_failure_is_lookup_failed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        db.close().await;

        let err = repo.fetch_product("B").await.unwrap_err();
        assert!(matches!(err, CartError::LookupFailed { ref id, .. } if id == "B"));
    }
}
