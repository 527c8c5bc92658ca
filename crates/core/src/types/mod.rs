//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{CartLine, StoredRecord, WishlistEntry};
pub use id::{IdError, ProductId};
pub use price::{PricePolicy, PriceVisibility, resolve_price};
pub use product::{DisplayFlags, Product};
pub use status::*;
