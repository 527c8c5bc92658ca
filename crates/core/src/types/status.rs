//! Status enums for the catalog and its list views.

use serde::{Deserialize, Serialize};

/// Loading state of the catalog.
///
/// While `Loading`, the previous catalog (if any) stays readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    /// No fetch has been requested yet.
    #[default]
    Idle,
    /// A fetch is outstanding.
    Loading,
    /// The last applied fetch succeeded.
    Ready,
    /// The last applied fetch failed; a retry is possible.
    Failed {
        /// Human readable failure description.
        message: String,
    },
}

impl LoadState {
    /// Whether a fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Ordering applied to a product list.
///
/// Every variant is a stable sort: products that compare equal keep their
/// prior relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Keep catalog or search order.
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    NameAsc,
}

impl SortOrder {
    /// Parse a sort key such as `price-asc`.
    ///
    /// Unknown keys fall back to [`SortOrder::None`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "rating-desc" | "rating" => Self::RatingDesc,
            "name-asc" | "name" => Self::NameAsc,
            _ => Self::None,
        }
    }
}
