//! Ayushyaa Storefront - catalog, cart, and checkout core.
//!
//! This library is the state-management core of the Ayushyaa Foods &
//! Naturals storefront. The rendering layer (whatever draws product cards
//! and the cart panel) is an external collaborator: it calls into this
//! crate and subscribes to cart-change notifications.
//!
//! # Architecture
//!
//! - Firestore REST API as the document backend for products, categories,
//!   variants, and orders - no local sync, direct reads and writes
//! - A device-local JSON file as the durable cart, full read-modify-write
//!   on every mutation
//! - A broadcast notifier so independent UI surfaces re-read the cart
//!   without coupling to each other
//! - Checkout writes the order and all line items in one atomic commit
//!
//! # Example
//!
//! ```rust,ignore
//! use ayushyaa_storefront::Storefront;
//!
//! let storefront = Storefront::from_env()?;
//!
//! let catalog = storefront.catalog().load_catalog().await;
//! let mut cart_events = storefront.cart().subscribe();
//!
//! storefront.cart().add(item)?;
//! let order_number = storefront.checkout().submit_order(&customer).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod firestore;
pub mod state;
pub mod telemetry;

pub use cart::{CartChanged, CartStore, CartSubscription};
pub use catalog::CatalogService;
pub use checkout::CheckoutService;
pub use config::{FirebaseConfig, StorefrontConfig};
pub use error::{Error, Result};
pub use state::Storefront;
