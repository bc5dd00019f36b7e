//! The persistent cart store and its change notifier.
//!
//! The cart is the only mutable state the storefront owns. It is exclusively
//! client-side - no server authority, no cross-device sync - and persists
//! indefinitely on the device until an order submission clears it.

mod notifier;
mod store;

pub use notifier::{CartChanged, CartNotifier, CartSubscription};
pub use store::{CartStore, CartStoreError};
