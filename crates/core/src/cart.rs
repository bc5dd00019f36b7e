//! The shopping cart and its merge-by-key semantics.
//!
//! A [`Cart`] is an ordered sequence of [`CartItem`]s, unique by
//! `(product id, variant id)`. Items embed full product and variant
//! snapshots taken at add-time, so a persisted cart round-trips without
//! live backend references. The in-cart price is what the order uses;
//! later catalog price edits do not touch items already in the cart.
//!
//! All operations here are pure; persistence and change notification live
//! in the storefront crate's cart store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductVariant};
use crate::types::{ProductId, VariantId};

/// A single cart entry: a (product, variant, quantity) triple.
///
/// Quantity is strictly positive while stored; an entry that would reach
/// zero is removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub variant: ProductVariant,
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart entry from add-time snapshots.
    #[must_use]
    pub const fn new(product: Product, variant: ProductVariant, quantity: u32) -> Self {
        Self {
            product,
            variant,
            quantity,
        }
    }

    /// The uniqueness key within a cart.
    #[must_use]
    pub fn key(&self) -> (&ProductId, &VariantId) {
        (&self.product.id, &self.variant.id)
    }

    /// `variant price × quantity` for this entry.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.variant.price * Decimal::from(self.quantity)
    }

    fn matches(&self, product_id: &ProductId, variant_id: &VariantId) -> bool {
        self.product.id == *product_id && self.variant.id == *variant_id
    }
}

/// An ordered sequence of cart items, unique by `(product id, variant id)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge an item into the cart. If an entry with the same key exists,
    /// its quantity is incremented by the new item's quantity; otherwise
    /// the item is appended.
    ///
    /// An item with quantity zero still merges (appending nothing-to-add is
    /// harmless for an existing key and a zero-quantity new entry is
    /// dropped), preserving the at-most-one-entry-per-key invariant.
    pub fn merge(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.key() == item.key())
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return;
        }
        if item.quantity > 0 {
            self.items.push(item);
        }
    }

    /// Replace the quantity of the entry with the given key. A quantity of
    /// zero removes the entry entirely. Returns `true` if an entry with the
    /// key was found.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> bool {
        let Some(index) = self
            .items
            .iter()
            .position(|i| i.matches(product_id, variant_id))
        else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(index);
        } else if let Some(item) = self.items.get_mut(index) {
            item.quantity = quantity;
        }
        true
    }

    /// Remove the entry with the given key, if present. Returns `true` if
    /// an entry was removed.
    pub fn remove(&mut self, product_id: &ProductId, variant_id: &VariantId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(product_id, variant_id));
        self.items.len() != before
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `variant price × quantity` over all entries.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
