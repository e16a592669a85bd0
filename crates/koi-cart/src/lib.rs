//! # koi-cart: Cart Store and Shared-Cart Importer
//!
//! The stateful half of the KoiShop cart engine. Pure cart rules live in
//! `koi-core`; this crate owns the session's cart, writes it through to
//! storage, and imports carts shared by link.
//!
//! ## Module Organization
//! ```text
//! koi_cart/
//! ├── lib.rs          ◄─── You are here
//! ├── store.rs        ◄─── CartStore (mutations, totals, checkout)
//! ├── importer.rs     ◄─── SharedCartImporter (Merge / Replace / Cancel)
//! ├── lookup.rs       ◄─── ProductLookup collaborator
//! ├── persistence.rs  ◄─── CartPersistence collaborator (SQLite, memory)
//! ├── prompt.rs       ◄─── SharedCartPrompt collaborator
//! ├── config.rs       ◄─── CartConfig (TOML + env)
//! └── error.rs        ◄─── CartError
//! ```
//!
//! ## Example
//! ```rust,ignore
//! let config = CartConfig::load(None)?;
//! let db = Database::new(DbConfig::new(config.database_path()?)).await?;
//!
//! let persistence = Arc::new(SqlitePersistence::new(db.carts(), &config.storage.cart_key));
//! let mut store = CartStore::open(persistence, config.checkout.template()).await;
//!
//! let importer = SharedCartImporter::new(db.products(), TerminalPrompt)
//!     .max_concurrent_lookups(config.import.max_concurrent_lookups);
//! importer.handle_shared_link(&mut store, "tea-01,tea-01,mug-02").await?;
//!
//! println!("{}", store.checkout_link());
//! ```

pub mod config;
pub mod error;
pub mod importer;
pub mod lookup;
pub mod persistence;
pub mod prompt;
pub mod store;

pub use config::CartConfig;
pub use error::{CartError, CartResult};
pub use importer::{ImportReport, SharedCartImporter, SharedCartOutcome};
pub use lookup::ProductLookup;
pub use persistence::{CartPersistence, MemoryPersistence, SqlitePersistence};
pub use prompt::{ImportChoice, SharedCartPrompt};
pub use store::CartStore;
