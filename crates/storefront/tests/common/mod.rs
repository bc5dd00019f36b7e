//! Shared fixtures for the wiremock-backed integration tests.

// Each integration test binary compiles its own copy; not every binary
// uses every fixture.
#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};

use ayushyaa_storefront::config::{FirebaseConfig, StorefrontConfig};

pub const PROJECT_ID: &str = "ayushyaa-test";
pub const API_KEY: &str = "test-key";

/// The resource prefix Firestore puts on every document name.
pub fn documents_root() -> String {
    format!("projects/{PROJECT_ID}/databases/(default)/documents")
}

/// The URL path (under the mock server) for a request against `suffix`,
/// e.g. `:runQuery`, `/categories`, `/products/p1/variants`.
pub fn api_path(suffix: &str) -> String {
    format!("/v1/{}{suffix}", documents_root())
}

/// A config pointing at the mock server, with the cart in a temp location.
pub fn test_config(server_uri: &str, cart_path: PathBuf) -> StorefrontConfig {
    StorefrontConfig {
        firebase: FirebaseConfig {
            project_id: PROJECT_ID.to_string(),
            api_key: SecretString::from(API_KEY),
            endpoint: format!("{server_uri}/v1"),
        },
        cart_path,
        catalog_cache_ttl: Duration::from_secs(300),
        request_timeout: Duration::from_secs(5),
    }
}

/// A `products` document in wire form.
pub fn product_doc(id: &str, name: &str, category_id: &str, base_price: f64) -> Value {
    json!({
        "name": format!("{}/products/{id}", documents_root()),
        "fields": {
            "category_id": {"stringValue": category_id},
            "name": {"stringValue": name},
            "slug": {"stringValue": name.to_lowercase().replace(' ', "-")},
            "description": {"stringValue": "Made with 100% natural ingredients"},
            "image_url": {"stringValue": format!("https://cdn.example/{id}.jpg")},
            "base_price": {"doubleValue": base_price},
            "is_active": {"booleanValue": true},
            "created_at": {"stringValue": "2024-01-15T08:00:00Z"},
            "updated_at": {"stringValue": "2024-02-20T08:00:00Z"}
        }
    })
}

/// A `categories` document in wire form.
pub fn category_doc(id: &str, name: &str, slug: &str) -> Value {
    json!({
        "name": format!("{}/categories/{id}", documents_root()),
        "fields": {
            "name": {"stringValue": name},
            "slug": {"stringValue": slug},
            "description": {"stringValue": ""}
        }
    })
}

/// A `products/{pid}/variants` document in wire form.
pub fn variant_doc(product_id: &str, variant_id: &str, weight: &str, price: f64) -> Value {
    json!({
        "name": format!("{}/products/{product_id}/variants/{variant_id}", documents_root()),
        "fields": {
            "id": {"stringValue": variant_id},
            "product_id": {"stringValue": product_id},
            "weight": {"stringValue": weight},
            "price": {"doubleValue": price},
            "stock": {"integerValue": "50"},
            "is_active": {"booleanValue": true}
        }
    })
}

/// A `runQuery` response: one entry per document, plus a trailing
/// metadata-only entry the way Firestore ends the stream.
pub fn run_query_response(documents: Vec<Value>) -> Value {
    let mut entries: Vec<Value> = documents
        .into_iter()
        .map(|doc| json!({"document": doc, "readTime": "2024-03-01T10:30:00Z"}))
        .collect();
    entries.push(json!({"readTime": "2024-03-01T10:30:00Z"}));
    Value::Array(entries)
}

/// A `ListDocuments` response. Firestore omits the `documents` key entirely
/// when the collection is empty.
pub fn list_response(documents: Vec<Value>) -> Value {
    if documents.is_empty() {
        json!({})
    } else {
        json!({"documents": documents})
    }
}
