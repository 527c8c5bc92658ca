//! Shopfront Core - Shared domain types library.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `storefront` - Catalog pipeline, cart/wishlist store and JSON boundary
//! - `cli` - Command-line tools for inspecting the catalog and durable store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used
//! anywhere, including from tests that need exact, deterministic values.
//!
//! # Modules
//!
//! - [`types`] - Product ids, products, cart lines, wishlist entries, price
//!   resolution and load/sort states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
