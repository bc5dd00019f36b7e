//! Catalog loading against a mocked Firestore backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ayushyaa_storefront::Storefront;

use common::{
    api_path, category_doc, documents_root, list_response, product_doc, run_query_response,
    test_config, variant_doc, API_KEY,
};

fn storefront_against(server: &MockServer) -> (Storefront, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path().join("ayushyaa_cart.json"));
    (Storefront::new(config).unwrap(), dir)
}

#[tokio::test]
async fn test_catalog_assembly_with_placeholder_category() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path(":runQuery")))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_query_response(vec![
            product_doc("p1", "Ragi Laddu", "cat-1", 100.0),
            product_doc("p2", "Herbal Tea", "cat-missing", 80.0),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            category_doc("cat-1", "Millet Sweets", "millet-sweets"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/products/p1/variants")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            variant_doc("p1", "v1", "250g", 100.0),
            variant_doc("p1", "v2", "500g", 180.0),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/products/p2/variants")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            variant_doc("p2", "v3", "100g", 80.0),
        ])))
        .mount(&server)
        .await;

    let (storefront, _cart_dir) = storefront_against(&server);
    let catalog = storefront.catalog().try_load_catalog().await.unwrap();

    // Backend return order is preserved.
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].product.name, "Ragi Laddu");
    assert_eq!(catalog[1].product.name, "Herbal Tea");

    // Resolved category vs the dangling-reference placeholder.
    assert_eq!(catalog[0].category.name, "Millet Sweets");
    assert_eq!(catalog[1].category.name, "Uncategorized");
    assert_eq!(catalog[1].category.slug, "uncategorized");

    assert_eq!(catalog[0].variants().len(), 2);
    assert_eq!(catalog[0].min_price(), Decimal::from(100));
    assert_eq!(catalog[1].variants()[0].weight, "100g");

    // The product query filtered on the active flag server-side.
    let requests = server.received_requests().await.unwrap();
    let query = requests
        .iter()
        .find(|r| r.url.path().ends_with(":runQuery"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&query.body).unwrap();
    assert_eq!(
        body["structuredQuery"]["where"]["fieldFilter"]["field"]["fieldPath"],
        json!("is_active")
    );
    assert_eq!(
        body["structuredQuery"]["where"]["fieldFilter"]["value"]["booleanValue"],
        json!(true)
    );
}

#[tokio::test]
async fn test_variant_less_product_is_excluded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path(":runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_query_response(vec![
            product_doc("p1", "Ragi Laddu", "cat-1", 100.0),
            product_doc("p2", "Herbal Tea", "cat-1", 80.0),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            category_doc("cat-1", "Millet Sweets", "millet-sweets"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/products/p1/variants")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            variant_doc("p1", "v1", "250g", 100.0),
        ])))
        .mount(&server)
        .await;
    // Firestore omits "documents" entirely for an empty sub-collection.
    Mock::given(method("GET"))
        .and(path(api_path("/products/p2/variants")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![])))
        .mount(&server)
        .await;

    let (storefront, _cart_dir) = storefront_against(&server);
    let catalog = storefront.catalog().try_load_catalog().await.unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].product.id.as_str(), "p1");
}

#[tokio::test]
async fn test_malformed_product_document_is_skipped() {
    let server = MockServer::start().await;

    // Second document has no fields at all; it must not poison the load.
    let bad_doc = json!({
        "name": format!("{}/products/broken", documents_root()),
        "fields": {}
    });
    Mock::given(method("POST"))
        .and(path(api_path(":runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_query_response(vec![
            product_doc("p1", "Ragi Laddu", "cat-1", 100.0),
            bad_doc,
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            category_doc("cat-1", "Millet Sweets", "millet-sweets"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/products/p1/variants")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            variant_doc("p1", "v1", "250g", 100.0),
        ])))
        .mount(&server)
        .await;

    let (storefront, _cart_dir) = storefront_against(&server);
    let catalog = storefront.catalog().try_load_catalog().await.unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].product.id.as_str(), "p1");
}

#[tokio::test]
async fn test_backend_failure_degrades_to_empty_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path(":runQuery")))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let (storefront, _cart_dir) = storefront_against(&server);

    assert!(storefront.catalog().try_load_catalog().await.is_err());
    // The lenient entry point serves an empty catalog instead.
    assert!(storefront.catalog().load_catalog().await.is_empty());
}

#[tokio::test]
async fn test_second_load_is_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path(":runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_query_response(vec![
            product_doc("p1", "Ragi Laddu", "cat-1", 100.0),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            category_doc("cat-1", "Millet Sweets", "millet-sweets"),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/products/p1/variants")))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![
            variant_doc("p1", "v1", "250g", 100.0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (storefront, _cart_dir) = storefront_against(&server);
    let first = storefront.catalog().try_load_catalog().await.unwrap();
    let second = storefront.catalog().try_load_catalog().await.unwrap();

    assert_eq!(first, second);
    // Mock expectations (one request per endpoint) are verified on drop.
}
