//! The assembled storefront: configuration plus the wired-up services.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::CatalogService;
use crate::checkout::CheckoutService;
use crate::config::StorefrontConfig;
use crate::error::Error;
use crate::firestore::FirestoreClient;

/// The storefront's shared state: one backend client, one cart store, and
/// the services built on them.
///
/// This struct is cheaply cloneable via `Arc`; hand clones to whatever
/// rendering layer drives the storefront.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    cart: CartStore,
    catalog: CatalogService,
    checkout: CheckoutService,
}

impl Storefront {
    /// Wire up the storefront from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be constructed (bad
    /// endpoint URL).
    pub fn new(config: StorefrontConfig) -> Result<Self, Error> {
        let client = FirestoreClient::new(&config.firebase, config.request_timeout)?;
        let cart = CartStore::open(&config.cart_path);
        let catalog = CatalogService::new(client.clone(), config.catalog_cache_ttl);
        let checkout = CheckoutService::new(client, cart.clone());

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                cart,
                catalog,
                checkout,
            }),
        })
    }

    /// Load configuration from the environment and wire up the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or
    /// the backend client cannot be constructed.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(StorefrontConfig::from_env()?)?)
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The persistent cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// The catalog loader.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// The checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
