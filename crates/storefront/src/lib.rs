//! Shopfront storefront library.
//!
//! The catalog aggregation pipeline, the cart/wishlist store and the JSON
//! boundary that exposes them. The binary in `main.rs` wires these into an
//! axum server; tests and the CLI use the library directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod search_task;
pub mod session;
pub mod state;
pub mod store;
pub mod upstream;
