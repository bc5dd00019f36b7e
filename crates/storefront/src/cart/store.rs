//! The persistent cart store.
//!
//! The durable cart lives in a single JSON file on the device, the Rust
//! rendition of the web client's `localStorage` entry. Every mutating
//! operation is a full read-modify-write of that file, never a delta, and
//! unconditionally fires a change notification - even when the mutation was
//! a no-op. Redundant redraws are the price of guaranteed UI consistency.
//!
//! Reads never fail: a missing or unparseable file degrades to the empty
//! cart. Mutations do return errors, because silently dropping a failed
//! persist would lose state the user can see.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ayushyaa_core::{Cart, CartItem, ProductId, VariantId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use super::notifier::{CartNotifier, CartSubscription};

/// Errors from persisting the cart file.
#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("cart file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The injectable, durable cart store.
///
/// Cheaply cloneable; clones share the same file, lock, and notifier. All
/// mutations are serialized by an internal mutex so the read-modify-write
/// cycle stays single-writer even if callers race.
#[derive(Debug, Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

#[derive(Debug)]
struct CartStoreInner {
    path: PathBuf,
    lock: Mutex<()>,
    notifier: CartNotifier,
}

impl CartStore {
    /// Open a cart store at the given file path. The file is created on the
    /// first mutation; until then the cart reads as empty.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                path: path.into(),
                lock: Mutex::new(()),
                notifier: CartNotifier::new(),
            }),
        }
    }

    /// Subscribe to change notifications. One event fires per mutating call.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        self.inner.notifier.subscribe()
    }

    /// The current persisted cart. Absence or unparseable data degrades to
    /// the empty cart; this never fails.
    #[must_use]
    pub fn get(&self) -> Cart {
        read_cart(&self.inner.path)
    }

    /// Merge an item into the cart: same-key entries have their quantities
    /// summed, new keys are appended. Persists and notifies.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart file cannot be written.
    pub fn add(&self, item: CartItem) -> Result<(), CartStoreError> {
        self.mutate(|cart| cart.merge(item))
    }

    /// Replace (not increment) the quantity of the entry with the given
    /// key; zero removes the entry. A missing key is not an error - the
    /// cart is still persisted and the notification still fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart file cannot be written.
    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<(), CartStoreError> {
        self.mutate(|cart| {
            let found = cart.set_quantity(product_id, variant_id, quantity);
            if !found {
                warn!(%product_id, %variant_id, "update_quantity on missing cart entry");
            }
        })
    }

    /// Remove the matching entry if present. Persists and notifies
    /// unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart file cannot be written.
    pub fn remove(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
    ) -> Result<(), CartStoreError> {
        self.mutate(|cart| {
            cart.remove(product_id, variant_id);
        })
    }

    /// Replace the cart with the empty sequence. Persists and notifies.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart file cannot be written.
    pub fn clear(&self) -> Result<(), CartStoreError> {
        self.mutate(Cart::clear)
    }

    /// Sum of `price × quantity` over the persisted cart. Pure read.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.get().total()
    }

    /// Sum of quantities over the persisted cart. Pure read.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.get().count()
    }

    /// The read-modify-write cycle shared by all mutations: read under the
    /// lock, apply, persist the whole cart, then notify.
    fn mutate(&self, apply: impl FnOnce(&mut Cart)) -> Result<(), CartStoreError> {
        let result = {
            let _guard = self
                .inner
                .lock
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let mut cart = read_cart(&self.inner.path);
            apply(&mut cart);
            write_cart(&self.inner.path, &cart)
        };
        // Notify after releasing the lock, and even for a failed persist:
        // subscribers re-read the store, so at worst they redraw the old
        // state that is still on disk.
        self.inner.notifier.notify();
        result
    }
}

fn read_cart(path: &Path) -> Cart {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(_) => return Cart::new(),
    };
    match serde_json::from_slice(&raw) {
        Ok(cart) => cart,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unparseable cart file, treating as empty");
            Cart::new()
        }
    }
}

/// Write the whole serialized cart, via a temp file + rename so a crash
/// mid-write cannot leave a torn file behind.
fn write_cart(path: &Path, cart: &Cart) -> Result<(), CartStoreError> {
    let serialized = serde_json::to_vec(cart)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
