//! Durable cart and wishlist management.
//!
//! # Usage
//!
//! ```bash
//! sf-cli cart show
//! sf-cli wishlist clear --dir /var/lib/shopfront
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_STORAGE_DIR` - Storage directory when `--dir` is not given

use std::path::PathBuf;
use std::sync::Arc;

use shopfront_core::PricePolicy;
use shopfront_storefront::store::{FileStorage, StorageError, Store};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreCommandError {
    /// The storage directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Which durable collection a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Cart,
    Wishlist,
}

fn open(dir: Option<PathBuf>) -> Result<Store, StoreCommandError> {
    dotenvy::dotenv().ok();

    let dir = dir
        .or_else(|| std::env::var("STOREFRONT_STORAGE_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(".shopfront"));

    tracing::info!("Opening storage in {}", dir.display());
    let storage = FileStorage::open(dir)?;
    Ok(Store::open(Arc::new(storage), PricePolicy::default()))
}

/// Log every stored record of a collection.
///
/// Returns the number of records.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
pub fn show(collection: Collection, dir: Option<PathBuf>) -> Result<usize, StoreCommandError> {
    let store = open(dir)?;

    let count = match collection {
        Collection::Cart => {
            let cart = store.cart();
            for line in cart.lines() {
                tracing::info!(
                    "  {} x{} @ {} - {}",
                    line.product_id,
                    line.quantity,
                    line.unit_price,
                    line.name
                );
            }
            tracing::info!(
                "{} lines, {} items, subtotal {}",
                cart.len(),
                cart.item_count(),
                cart.subtotal()
            );
            cart.len()
        }
        Collection::Wishlist => {
            let wishlist = store.wishlist();
            for entry in wishlist.entries() {
                tracing::info!("  {} @ {} - {}", entry.product_id, entry.price, entry.name);
            }
            tracing::info!("{} entries", wishlist.len());
            wishlist.len()
        }
    };

    Ok(count)
}

/// Remove every record of a collection.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
pub fn clear(collection: Collection, dir: Option<PathBuf>) -> Result<(), StoreCommandError> {
    let mut store = open(dir)?;

    match collection {
        Collection::Cart => store.clear_cart(),
        Collection::Wishlist => store.clear_wishlist(),
    }

    tracing::info!("Cleared {collection:?}");
    Ok(())
}
