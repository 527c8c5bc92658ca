//! Cart and wishlist state with write-through persistence.
//!
//! [`Store`] owns the in-memory collections and hands the affected collection
//! to a [`WriteBehind`] after every mutation that changed it. Persistence
//! failures are logged and never roll back the in-memory state.

mod cart;
pub mod storage;
mod wishlist;

use std::sync::Arc;

use shopfront_core::{CartLine, PricePolicy, Product, ProductId, StoredRecord, WishlistEntry};
use tracing::debug;

pub use cart::Cart;
pub use storage::{
    CART_KEY, DurableStorage, FileStorage, MemoryStorage, StorageError, WISHLIST_KEY, WriteBehind,
};
pub use wishlist::Wishlist;

use crate::error::add_breadcrumb;

/// Session cart and wishlist backed by durable storage.
pub struct Store {
    cart: Cart,
    wishlist: Wishlist,
    writer: WriteBehind,
    policy: PricePolicy,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Seed both collections from storage.
    ///
    /// Missing or corrupt collections start empty.
    pub fn open(storage: Arc<dyn DurableStorage>, policy: PricePolicy) -> Self {
        let cart = Cart::from_lines(
            storage::load_records(storage.as_ref(), CART_KEY)
                .into_iter()
                .filter_map(|r| CartLine::try_from(r).ok()),
        );
        let wishlist = Wishlist::from_entries(
            storage::load_records(storage.as_ref(), WISHLIST_KEY)
                .into_iter()
                .filter_map(|r| WishlistEntry::try_from(r).ok()),
        );
        debug!(
            cart_lines = cart.len(),
            wishlist_entries = wishlist.len(),
            "Loaded durable collections"
        );

        Self {
            cart,
            wishlist,
            writer: WriteBehind::new(storage),
            policy,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub const fn policy(&self) -> PricePolicy {
        self.policy
    }

    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        self.cart.add_or_merge(product, quantity, self.policy);
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product.id.as_str())]),
        );
        self.persist_cart();
    }

    /// Returns `false` for a quantity below 1 or an id not in the cart.
    pub fn update_cart_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        let changed = self.cart.update_quantity(id, quantity);
        if changed {
            let quantity = quantity.to_string();
            add_breadcrumb(
                "cart",
                "Updated cart quantity",
                Some(&[("product_id", id.as_str()), ("quantity", &quantity)]),
            );
            self.persist_cart();
        }
        changed
    }

    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        let removed = self.cart.remove(id);
        if removed {
            add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));
            self.persist_cart();
        }
        removed
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        add_breadcrumb("cart", "Cleared cart", None);
        self.persist_cart();
    }

    /// Returns `true` when the product is wishlisted afterwards.
    pub fn toggle_wishlist(&mut self, product: &Product) -> bool {
        let added = self.wishlist.toggle(product, self.policy);
        add_breadcrumb(
            "wishlist",
            if added { "Added to wishlist" } else { "Removed from wishlist" },
            Some(&[("product_id", product.id.as_str())]),
        );
        self.persist_wishlist();
        added
    }

    /// Remove by id; works for products no longer in the catalog.
    pub fn remove_from_wishlist(&mut self, id: &ProductId) -> bool {
        let removed = self.wishlist.remove(id);
        if removed {
            add_breadcrumb(
                "wishlist",
                "Removed from wishlist",
                Some(&[("product_id", id.as_str())]),
            );
            self.persist_wishlist();
        }
        removed
    }

    pub fn clear_wishlist(&mut self) {
        self.wishlist.clear();
        add_breadcrumb("wishlist", "Cleared wishlist", None);
        self.persist_wishlist();
    }

    fn persist_cart(&self) {
        let records: Vec<StoredRecord> = self.cart.lines().iter().map(StoredRecord::from).collect();
        self.writer.save(CART_KEY, &records);
    }

    fn persist_wishlist(&self) {
        let records: Vec<StoredRecord> = self
            .wishlist
            .entries()
            .iter()
            .map(StoredRecord::from)
            .collect();
        self.writer.save(WISHLIST_KEY, &records);
    }
}
