//! Firestore REST API client.
//!
//! # Architecture
//!
//! - Plain `reqwest` + JSON against the Firestore REST v1 API
//! - Firestore is the source of truth for the catalog and for orders -
//!   no local sync, direct reads at page load and writes at checkout
//! - The only collections touched are the ones the storefront owns traffic
//!   for: `products` (filtered by `is_active`), `categories`,
//!   `products/{id}/variants`, `orders`, and `orders/{id}/items`
//!
//! # Example
//!
//! ```rust,ignore
//! use ayushyaa_storefront::firestore::{FirestoreClient, StructuredQuery, Value};
//!
//! let client = FirestoreClient::new(&config.firebase, config.request_timeout)?;
//!
//! let products = client
//!     .run_query(StructuredQuery::collection("products").with_eq_filter(
//!         "is_active",
//!         Value::boolean(true),
//!     ))
//!     .await?;
//! ```

mod client;
mod conversions;
mod documents;
mod query;

pub use client::FirestoreClient;
pub use conversions::{
    category_from_document, order_item_to_fields, order_to_fields, product_from_document,
    variant_from_document,
};
pub use documents::{ArrayValue, Document, MapValue, Precondition, Value, Write};
pub use query::StructuredQuery;

use thiserror::Error;

/// Errors that can occur when talking to Firestore.
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// HTTP request failed (connect, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured endpoint is not a valid URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Firestore returned a non-success status.
    #[error("Firestore returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A document is missing a field the storefront requires.
    #[error("document {doc} is missing field `{field}`")]
    MissingField { field: &'static str, doc: String },

    /// A document field has an unusable value (wrong type, bad number).
    #[error("document {doc} has an invalid `{field}` field")]
    InvalidField { field: &'static str, doc: String },
}
