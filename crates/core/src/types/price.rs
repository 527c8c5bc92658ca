//! Price resolution using decimal arithmetic.
//!
//! A product carries up to three price fields: the listed `price`, an
//! optional percentage `discount` and an optional `original_price`. The
//! resolved price is computed once, when a product becomes a cart line, and
//! the cart line keeps that value regardless of later catalog changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which field wins when `original_price` is present but no discount applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PricePolicy {
    /// `original_price` overrides the listed price whenever it is present.
    #[default]
    OriginalPriceWins,
    /// The listed price is used unless a discount applies.
    ExplicitPriceWins,
}

impl PricePolicy {
    /// Parse a policy name as used in configuration.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original-price" | "original" => Some(Self::OriginalPriceWins),
            "explicit-price" | "explicit" => Some(Self::ExplicitPriceWins),
            _ => None,
        }
    }
}

/// Whether prices may be shown for the current session.
///
/// Catalogs fetched anonymously from the read-only endpoint carry no usable
/// prices, so display of every price is suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceVisibility {
    #[default]
    Shown,
    Hidden,
}

/// Resolve the final unit price from the three price fields.
///
/// - `discount > 0` with `original_price` present: `original × (1 − discount/100)`
/// - `original_price` present, no discount: `original_price` under
///   [`PricePolicy::OriginalPriceWins`], `price` under
///   [`PricePolicy::ExplicitPriceWins`]
/// - otherwise: `price`
///
/// The result is never negative.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use shopfront_core::{PricePolicy, resolve_price};
///
/// let resolved = resolve_price(
///     Decimal::from(1000),
///     Some(Decimal::from(10)),
///     Some(Decimal::from(1000)),
///     PricePolicy::OriginalPriceWins,
/// );
/// assert_eq!(resolved, Decimal::from(900));
/// ```
#[must_use]
pub fn resolve_price(
    price: Decimal,
    discount: Option<Decimal>,
    original_price: Option<Decimal>,
    policy: PricePolicy,
) -> Decimal {
    let discount = discount.filter(|d| d.is_sign_positive() && !d.is_zero());

    let resolved = match (discount, original_price) {
        (Some(discount), Some(original)) => {
            original * (Decimal::ONE - discount / Decimal::ONE_HUNDRED)
        }
        (None, Some(original)) => match policy {
            PricePolicy::OriginalPriceWins => original,
            PricePolicy::ExplicitPriceWins => price,
        },
        (_, None) => price,
    };

    resolved.max(Decimal::ZERO).normalize()
}
