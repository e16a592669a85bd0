//! # Repository Module
//!
//! Database repository implementations for the cart engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SharedCartImporter                 CartStore                          │
//! │       │ db.products().get_by_id()       │ db.carts().save("cart", ..)  │
//! │       ▼                                 ▼                               │
//! │  ProductRepository                 CartRepository                      │
//! │  ├── get_by_id                     ├── load                            │
//! │  ├── insert / update               ├── save                            │
//! │  ├── soft_delete                   └── delete                          │
//! │  └── list_active / count                                               │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  products table                    cart_state table                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog
//! - [`cart::CartRepository`] - Persisted cart line items

pub mod cart;
pub mod product;
