//! # koi-db: Database Layer for the KoiShop Cart Engine
//!
//! This crate provides local storage for the cart engine.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KoiShop Cart Data Flow                           │
//! │                                                                         │
//! │  SharedCartImporter (lookup)        CartStore (persist / rehydrate)    │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     koi-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CartRepo      │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir)/koi.db                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Product catalog and cart state repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use koi_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/koi.db")).await?;
//!
//! let tea = db.products().get_by_id("tea-01").await?;
//! let saved = db.carts().load("cart").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::cart::CartRepository;
pub use repository::product::ProductRepository;
