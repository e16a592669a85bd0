//! # Cart Configuration
//!
//! Configuration management for the cart service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KOI_CHECKOUT_PHONE=5354149326                                      │
//! │     KOI_DB_PATH=/tmp/koi.db                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/koishop/koi.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.koi.shop/koi.toml (macOS)        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     wa.me endpoint, KoiShop greeting, platform data dir database       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # koi.toml
//! [checkout]
//! phone_number = "5354149326"
//! endpoint = "https://wa.me"
//!
//! [storage]
//! database_path = "/var/lib/koi/koi.db"
//! cart_key = "cart"
//!
//! [import]
//! max_concurrent_lookups = 8
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult};
use koi_core::checkout::{DEFAULT_ENDPOINT, DEFAULT_GREETING, DEFAULT_RECIPIENT};
use koi_core::CheckoutTemplate;

const CONFIG_FILE_NAME: &str = "koi.toml";
const DATABASE_FILE_NAME: &str = "koi.db";

// =============================================================================
// Checkout Settings
// =============================================================================

/// Where and how the checkout message is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Recipient phone number, international format, digits only.
    #[serde(default = "default_phone_number")]
    pub phone_number: String,

    /// Text placed before the item list.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Messaging service base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_phone_number() -> String {
    DEFAULT_RECIPIENT.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            phone_number: default_phone_number(),
            greeting: default_greeting(),
            endpoint: default_endpoint(),
        }
    }
}

impl CheckoutSettings {
    /// Builds the message template these settings describe.
    pub fn template(&self) -> CheckoutTemplate {
        CheckoutTemplate {
            recipient: self.phone_number.clone(),
            greeting: self.greeting.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the cart and the catalog live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. `None` resolves to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Key the cart is saved under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    "cart".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            cart_key: default_cart_key(),
        }
    }
}

// =============================================================================
// Import Settings
// =============================================================================

/// Shared-cart import behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Upper bound on product lookups in flight during one import.
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

fn default_max_concurrent_lookups() -> usize {
    8
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            max_concurrent_lookups: default_max_concurrent_lookups(),
        }
    }
}

// =============================================================================
// Main Cart Configuration
// =============================================================================

/// Complete cart service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Checkout message settings.
    #[serde(default)]
    pub checkout: CheckoutSettings,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Shared-cart import settings.
    #[serde(default)]
    pub import: ImportSettings,
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (koi.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CartResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CartError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CartError::ConfigSaveFailed(format!("{}: {e}", parent.display())))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| CartError::ConfigSaveFailed(format!("{}: {e}", path.display())))?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        let phone = &self.checkout.phone_number;
        if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(CartError::InvalidConfig(format!(
                "phone_number must be digits only, got: '{}'",
                phone
            )));
        }

        let endpoint = &self.checkout.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(CartError::InvalidConfig(format!(
                "endpoint must start with http:// or https://, got: {}",
                endpoint
            )));
        }

        if self.storage.cart_key.trim().is_empty() {
            return Err(CartError::InvalidConfig("cart_key must not be empty".into()));
        }

        if self.import.max_concurrent_lookups == 0 {
            return Err(CartError::InvalidConfig(
                "max_concurrent_lookups must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(phone) = std::env::var("KOI_CHECKOUT_PHONE") {
            debug!(phone = %phone, "Overriding checkout phone from environment");
            self.checkout.phone_number = phone;
        }

        if let Ok(greeting) = std::env::var("KOI_CHECKOUT_GREETING") {
            self.checkout.greeting = greeting;
        }

        if let Ok(path) = std::env::var("KOI_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Ok(key) = std::env::var("KOI_CART_KEY") {
            self.storage.cart_key = key;
        }

        if let Ok(limit) = std::env::var("KOI_IMPORT_CONCURRENCY") {
            match limit.parse::<usize>() {
                Ok(n) => self.import.max_concurrent_lookups = n,
                Err(_) => warn!(value = %limit, "Ignoring non-numeric KOI_IMPORT_CONCURRENCY"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "koi", "shop")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolves the database file: explicit setting, else the platform data dir.
    pub fn database_path(&self) -> CartResult<PathBuf> {
        if let Some(ref path) = self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or_else(|| {
            CartError::InvalidConfig("Could not determine app data directory".into())
        })?;
        std::fs::create_dir_all(dirs.data_dir())?;
        Ok(dirs.data_dir().join(DATABASE_FILE_NAME))
    }
}
