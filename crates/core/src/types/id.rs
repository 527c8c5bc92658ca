//! Product identifier type.
//!
//! Upstream records carry ids as either strings or numbers. Both are
//! normalized into a trimmed, non-empty string key so that `"42"` and `42`
//! refer to the same product.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is empty or whitespace only.
    #[error("product id cannot be empty")]
    Empty,
}

/// Unique key of a product in the catalog.
///
/// Also used as the foreign key of cart lines and wishlist entries.
///
/// # Examples
///
/// ```
/// use shopfront_core::ProductId;
///
/// let id = ProductId::parse(" sku-1 ").unwrap();
/// assert_eq!(id.as_str(), "sku-1");
/// assert!(ProductId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] if nothing remains after trimming.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::str::FromStr for ProductId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
