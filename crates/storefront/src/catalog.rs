//! Catalog loading: the denormalized product/category/variant read model.
//!
//! One load performs the fetch sequence the storefront page needs:
//!
//! 1. all products flagged active (one filtered query)
//! 2. all categories, once, into a lookup map (avoids a round-trip per
//!    product)
//! 3. each product's variants sub-collection, fetched concurrently under a
//!    bounded fan-out and joined before assembly
//!
//! Assembly favors availability over strict integrity: a dangling category
//! reference gets the `Uncategorized` placeholder, malformed documents are
//! logged and skipped, and a variant-less product is excluded rather than
//! left to fail in display code. Assembled catalogs are cached with a short
//! TTL.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use ayushyaa_core::{Category, CategoryId, Product, ProductWithVariants};
use moka::future::Cache;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::firestore::{
    Document, FirestoreClient, FirestoreError, StructuredQuery, Value, category_from_document,
    product_from_document, variant_from_document,
};

/// Upper bound on simultaneous variant fetches, so the fan-out stays
/// polite as the catalog grows.
const DEFAULT_FANOUT_LIMIT: usize = 8;

/// Errors from a catalog load.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A backend read failed.
    #[error("backend error: {0}")]
    Firestore(#[from] FirestoreError),

    /// A variant fetch task panicked or was cancelled.
    #[error("variant fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Cache key for assembled catalogs.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    ActiveProducts,
}

/// Loads and assembles the storefront catalog.
///
/// Cheaply cloneable; clones share the backend client and the cache.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    client: FirestoreClient,
    cache: Cache<CacheKey, Arc<Vec<ProductWithVariants>>>,
    fanout_limit: usize,
}

impl CatalogService {
    /// Create a catalog service with the given cache TTL.
    #[must_use]
    pub fn new(client: FirestoreClient, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogServiceInner {
                client,
                cache,
                fanout_limit: DEFAULT_FANOUT_LIMIT,
            }),
        }
    }

    /// Load the catalog, degrading to an empty result on any backend
    /// failure. The failure is logged, not surfaced; the storefront renders
    /// an empty product list rather than an error page.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) -> Vec<ProductWithVariants> {
        match self.try_load_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "catalog load failed, serving empty catalog");
                Vec::new()
            }
        }
    }

    /// Load the catalog, surfacing backend failures to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the reads fails; there is no
    /// partial-result policy - the whole load fails together.
    #[instrument(skip(self))]
    pub async fn try_load_catalog(&self) -> Result<Vec<ProductWithVariants>, CatalogError> {
        if let Some(cached) = self.inner.cache.get(&CacheKey::ActiveProducts).await {
            debug!("cache hit for catalog");
            return Ok((*cached).clone());
        }

        let catalog = self.fetch_catalog().await?;
        self.inner
            .cache
            .insert(CacheKey::ActiveProducts, Arc::new(catalog.clone()))
            .await;
        Ok(catalog)
    }

    /// Drop the cached catalog and load a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the fresh load fails.
    pub async fn refresh(&self) -> Result<Vec<ProductWithVariants>, CatalogError> {
        self.inner.cache.invalidate_all();
        self.try_load_catalog().await
    }

    async fn fetch_catalog(&self) -> Result<Vec<ProductWithVariants>, CatalogError> {
        // 1. Active products, in the backend's natural return order.
        let product_docs = self
            .inner
            .client
            .run_query(
                StructuredQuery::collection("products")
                    .with_eq_filter("is_active", Value::boolean(true)),
            )
            .await?;
        let products: Vec<Product> = product_docs
            .iter()
            .filter_map(|doc| match product_from_document(doc) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(error = %e, "skipping malformed product document");
                    None
                }
            })
            .collect();

        // 2. All categories, once.
        let category_map = self.load_category_map().await?;

        // 3. Variants, fanned out under the concurrency bound and joined
        //    before any assembly.
        let variant_docs = self.fetch_variants(&products).await?;

        // 4. Assemble, preserving product order.
        let mut catalog = Vec::with_capacity(products.len());
        for (product, docs) in products.into_iter().zip(variant_docs) {
            let variants = docs
                .iter()
                .filter_map(|doc| match variant_from_document(doc, &product.id) {
                    Ok(variant) => Some(variant),
                    Err(e) => {
                        warn!(error = %e, "skipping malformed variant document");
                        None
                    }
                })
                .collect();

            let category = category_map
                .get(&product.category_id)
                .cloned()
                .unwrap_or_else(Category::uncategorized);

            let product_id = product.id.clone();
            match ProductWithVariants::new(product, category, variants) {
                Ok(assembled) => catalog.push(assembled),
                Err(e) => {
                    warn!(%product_id, error = %e, "excluding variant-less product from catalog");
                }
            }
        }

        Ok(catalog)
    }

    async fn load_category_map(
        &self,
    ) -> Result<HashMap<CategoryId, Category>, CatalogError> {
        let docs = self.inner.client.list_documents("categories").await?;
        let mut map = HashMap::with_capacity(docs.len());
        for doc in &docs {
            match category_from_document(doc) {
                Ok(category) => {
                    map.insert(category.id.clone(), category);
                }
                Err(e) => warn!(error = %e, "skipping malformed category document"),
            }
        }
        Ok(map)
    }

    /// Fetch every product's variants sub-collection, at most
    /// `fanout_limit` requests in flight, results joined in product order.
    /// The first failure fails the whole load.
    async fn fetch_variants(
        &self,
        products: &[Product],
    ) -> Result<Vec<Vec<Document>>, CatalogError> {
        let mut pending: VecDeque<(usize, String)> = products
            .iter()
            .enumerate()
            .map(|(index, product)| (index, format!("products/{}/variants", product.id)))
            .collect();

        let mut results: Vec<Vec<Document>> = vec![Vec::new(); products.len()];
        let mut join_set: JoinSet<(usize, Result<Vec<Document>, FirestoreError>)> =
            JoinSet::new();

        loop {
            while join_set.len() < self.inner.fanout_limit {
                let Some((index, path)) = pending.pop_front() else {
                    break;
                };
                let client = self.inner.client.clone();
                join_set
                    .spawn(async move { (index, client.list_documents(&path).await) });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            let (index, fetched) = joined?;
            if let Some(slot) = results.get_mut(index) {
                *slot = fetched?;
            }
        }

        Ok(results)
    }
}
