//! # koi-core: Pure Cart Logic for KoiShop
//!
//! This crate is the **heart** of the KoiShop cart engine. It contains the
//! cart rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KoiShop Cart Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    koi-cart (service layer)                     │   │
//! │  │    CartStore ◄──── SharedCartImporter ────► ProductLookup       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ koi-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ checkout  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  message  │  │   │
//! │  │   │           │  │           │  │ LineItem  │  │  + link   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product record
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart, LineItem and derived totals
//! - [`checkout`] - Checkout message rendering and deep link encoding
//! - [`share`] - Shared-cart link payload codec
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use koi_core::{Cart, CheckoutTemplate, Product};
//!
//! let tea = Product::new("tea", "Green Tea", 500).with_weight(100);
//!
//! let mut cart = Cart::new();
//! cart.add_item(&tea);
//! cart.add_item(&tea);
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().cents(), 1000);
//! assert_eq!(cart.total_weight(), 200);
//!
//! let message = CheckoutTemplate::default().render(&cart);
//! assert!(message.contains("• Green Tea (2x) - $10.00"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod share;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals, LineItem};
pub use checkout::CheckoutTemplate;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use share::{decode_shared_cart, encode_shared_cart};
pub use types::Product;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of identifiers accepted from a single shared-cart link.
///
/// A shared payload repeats an identifier once per unit, so this also caps
/// the total quantity a single link can import.
pub const MAX_SHARED_IDS: usize = 500;

/// Maximum length of a product identifier.
pub const MAX_PRODUCT_ID_LEN: usize = 64;
