//! Cart collection.
//!
//! At most one line exists per product id. Every operation is total: an
//! unknown id or a quantity below 1 leaves the cart unchanged.

use rust_decimal::Decimal;
use shopfront_core::{CartLine, PricePolicy, Product, ProductId};

/// Ordered cart lines, unique by product id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Build a cart from stored lines, keeping the first line per product.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::default();
        for line in lines {
            if cart.position(&line.product_id).is_none() {
                cart.lines.push(line);
            }
        }
        cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.position(id).and_then(|i| self.lines.get(i))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `unit_price × quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Increase an existing line by `quantity`, or add a new line priced by
    /// the resolver. A quantity of 0 counts as 1.
    pub fn add_or_merge(&mut self, product: &Product, quantity: u32, policy: PricePolicy) {
        let quantity = quantity.max(1);
        match self.position(&product.id).and_then(|i| self.lines.get_mut(i)) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self
                .lines
                .push(CartLine::from_product(product, quantity, policy)),
        }
        debug_assert!(self.ids_unique(), "duplicate cart line");
    }

    /// Set a line's quantity exactly.
    ///
    /// Returns `false` (and changes nothing) for a quantity below 1 or an
    /// unknown id.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        match self.position(id).and_then(|i| self.lines.get_mut(i)) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != id);
        self.lines.len() < before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|l| &l.product_id == id)
    }

    fn ids_unique(&self) -> bool {
        let mut ids: Vec<&ProductId> = self.lines.iter().map(|l| &l.product_id).collect();
        ids.sort_unstable();
        ids.windows(2).all(|w| w.first() != w.get(1))
    }
}
