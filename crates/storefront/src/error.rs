//! Unified error handling for the storefront library.
//!
//! Each subsystem carries its own error enum; this type aggregates them for
//! callers that wire the whole storefront together and want one `?` type.

use thiserror::Error;

use crate::cart::CartStoreError;
use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::firestore::FirestoreError;

/// Top-level error type for the storefront.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Firestore backend failed.
    #[error("Backend error: {0}")]
    Firestore(#[from] FirestoreError),

    /// The local cart file could not be persisted.
    #[error("Cart store error: {0}")]
    CartStore(#[from] CartStoreError),

    /// A catalog load failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// An order submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
