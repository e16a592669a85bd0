//! # Shared-Cart Prompt
//!
//! Asks the user how an incoming shared cart should meet the local one.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  You already have 3 items ($13.00) in your   │
//! │  cart. The link contains 2 items.            │
//! │                                              │
//! │   [ Merge ]    [ Replace ]    [ Cancel ]     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The importer awaits the answer without a timeout.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use koi_core::CartTotals;

/// The user's answer to the shared-cart dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportChoice {
    /// Add the shared items on top of the current cart.
    Merge,

    /// Empty the current cart, then add the shared items.
    Replace,

    /// Leave the current cart alone.
    Cancel,
}

impl fmt::Display for ImportChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportChoice::Merge => write!(f, "merge"),
            ImportChoice::Replace => write!(f, "replace"),
            ImportChoice::Cancel => write!(f, "cancel"),
        }
    }
}

impl std::str::FromStr for ImportChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "merge" => Ok(ImportChoice::Merge),
            "r" | "replace" => Ok(ImportChoice::Replace),
            "c" | "cancel" => Ok(ImportChoice::Cancel),
            other => Err(format!(
                "Unknown choice: '{}'. Valid options: merge, replace, cancel",
                other
            )),
        }
    }
}

/// Presents the Merge / Replace / Cancel dialog.
#[async_trait]
pub trait SharedCartPrompt: Send + Sync {
    /// `current` describes the local cart, `incoming` is the number of
    /// identifiers in the shared link.
    async fn choose(&self, current: &CartTotals, incoming: usize) -> ImportChoice;
}

#[async_trait]
impl<T: SharedCartPrompt + ?Sized> SharedCartPrompt for Arc<T> {
    async fn choose(&self, current: &CartTotals, incoming: usize) -> ImportChoice {
        (**self).choose(current, incoming).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parsing() {
        assert_eq!("merge".parse::<ImportChoice>().unwrap(), ImportChoice::Merge);
        assert_eq!(" R\n".parse::<ImportChoice>().unwrap(), ImportChoice::Replace);
        assert_eq!("c".parse::<ImportChoice>().unwrap(), ImportChoice::Cancel);
        assert!("yes".parse::<ImportChoice>().is_err());
    }

    #[test]
    fn test_choice_display_roundtrip() {
        for choice in [ImportChoice::Merge, ImportChoice::Replace, ImportChoice::Cancel] {
            assert_eq!(choice.to_string().parse::<ImportChoice>().unwrap(), choice);
        }
    }
}
