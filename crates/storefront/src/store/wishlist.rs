//! Wishlist collection.

use shopfront_core::{PricePolicy, Product, ProductId, WishlistEntry};

/// Ordered wishlist entries, unique by product id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// Build a wishlist from stored entries, keeping the first per product.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = WishlistEntry>) -> Self {
        let mut wishlist = Self::default();
        for entry in entries {
            if !wishlist.contains(&entry.product_id) {
                wishlist.entries.push(entry);
            }
        }
        wishlist
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.product_id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove the entry for this product if present, otherwise add a snapshot.
    ///
    /// Returns `true` when the product is wishlisted afterwards.
    pub fn toggle(&mut self, product: &Product, policy: PricePolicy) -> bool {
        if self.remove(&product.id) {
            false
        } else {
            self.entries.push(WishlistEntry::from_product(product, policy));
            true
        }
    }

    /// Remove an entry by id. Returns whether an entry was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product_id != id);
        self.entries.len() < before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
