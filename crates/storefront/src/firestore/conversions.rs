//! Conversions between Firestore wire documents and core domain models.

use std::collections::BTreeMap;

use ayushyaa_core::{
    Category, CategoryId, Order, OrderItem, Product, ProductId, ProductVariant, VariantId,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::FirestoreError;
use super::documents::{Document, Value};

// =============================================================================
// Field access helpers
// =============================================================================

fn doc_label(doc: &Document) -> String {
    doc.doc_id().unwrap_or("<unnamed>").to_string()
}

fn require<'a>(doc: &'a Document, field: &'static str) -> Result<&'a Value, FirestoreError> {
    doc.field(field).ok_or_else(|| FirestoreError::MissingField {
        field,
        doc: doc_label(doc),
    })
}

fn require_str(doc: &Document, field: &'static str) -> Result<String, FirestoreError> {
    require(doc, field)?
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| FirestoreError::InvalidField {
            field,
            doc: doc_label(doc),
        })
}

fn require_bool(doc: &Document, field: &'static str) -> Result<bool, FirestoreError> {
    require(doc, field)?
        .as_bool()
        .ok_or_else(|| FirestoreError::InvalidField {
            field,
            doc: doc_label(doc),
        })
}

fn require_i64(doc: &Document, field: &'static str) -> Result<i64, FirestoreError> {
    require(doc, field)?
        .as_i64()
        .ok_or_else(|| FirestoreError::InvalidField {
            field,
            doc: doc_label(doc),
        })
}

fn require_decimal(doc: &Document, field: &'static str) -> Result<Decimal, FirestoreError> {
    let raw = require(doc, field)?
        .as_f64()
        .ok_or_else(|| FirestoreError::InvalidField {
            field,
            doc: doc_label(doc),
        })?;
    Decimal::try_from(raw).map_err(|_| FirestoreError::InvalidField {
        field,
        doc: doc_label(doc),
    })
}

fn decimal_to_value(amount: Decimal, field: &'static str) -> Result<Value, FirestoreError> {
    amount
        .to_f64()
        .map(Value::double)
        .ok_or(FirestoreError::InvalidField {
            field,
            doc: "<outgoing>".to_string(),
        })
}

/// The document ID, required for reads (queried documents always carry one).
fn require_doc_id(doc: &Document) -> Result<&str, FirestoreError> {
    doc.doc_id().ok_or(FirestoreError::MissingField {
        field: "name",
        doc: "<unnamed>".to_string(),
    })
}

// =============================================================================
// Reads: catalog documents
// =============================================================================

/// Decode a `categories` document.
///
/// # Errors
///
/// Returns an error if required fields are missing or mistyped.
pub fn category_from_document(doc: &Document) -> Result<Category, FirestoreError> {
    Ok(Category {
        id: CategoryId::new(require_doc_id(doc)?),
        name: require_str(doc, "name")?,
        slug: require_str(doc, "slug")?,
        description: require_str(doc, "description").unwrap_or_default(),
        created_at: doc.field("created_at").and_then(Value::as_datetime),
    })
}

/// Decode a `products` document.
///
/// # Errors
///
/// Returns an error if required fields are missing or mistyped.
pub fn product_from_document(doc: &Document) -> Result<Product, FirestoreError> {
    Ok(Product {
        id: ProductId::new(require_doc_id(doc)?),
        category_id: CategoryId::new(require_str(doc, "category_id")?),
        name: require_str(doc, "name")?,
        slug: require_str(doc, "slug")?,
        description: require_str(doc, "description").unwrap_or_default(),
        image_url: require_str(doc, "image_url").unwrap_or_default(),
        base_price: require_decimal(doc, "base_price")?,
        is_active: require_bool(doc, "is_active")?,
        created_at: doc.field("created_at").and_then(Value::as_datetime),
        updated_at: doc.field("updated_at").and_then(Value::as_datetime),
    })
}

/// Decode a `products/{id}/variants` document.
///
/// The admin tool writes a denormalized `id` field alongside the document
/// ID; when present it wins, matching what the web client displayed.
///
/// # Errors
///
/// Returns an error if required fields are missing or mistyped.
pub fn variant_from_document(
    doc: &Document,
    product_id: &ProductId,
) -> Result<ProductVariant, FirestoreError> {
    let id = match doc.field("id").and_then(Value::as_str) {
        Some(field_id) => field_id.to_string(),
        None => require_doc_id(doc)?.to_string(),
    };
    let product_id = doc
        .field("product_id")
        .and_then(Value::as_str)
        .map_or_else(|| product_id.clone(), ProductId::new);

    Ok(ProductVariant {
        id: VariantId::new(id),
        product_id,
        weight: require_str(doc, "weight")?,
        price: require_decimal(doc, "price")?,
        stock: require_i64(doc, "stock").unwrap_or(0),
        is_active: require_bool(doc, "is_active").unwrap_or(true),
    })
}

// =============================================================================
// Writes: order documents
// =============================================================================

/// Encode an order into `orders` document fields.
///
/// # Errors
///
/// Returns an error if the total cannot be represented as a double.
pub fn order_to_fields(order: &Order) -> Result<BTreeMap<String, Value>, FirestoreError> {
    let mut fields = BTreeMap::new();
    fields.insert(
        "order_number".to_string(),
        Value::string(order.order_number.as_str()),
    );
    fields.insert(
        "customer_name".to_string(),
        Value::string(&order.customer_name),
    );
    fields.insert(
        "customer_phone".to_string(),
        Value::string(&order.customer_phone),
    );
    fields.insert(
        "customer_email".to_string(),
        Value::string(&order.customer_email),
    );
    fields.insert(
        "shipping_address".to_string(),
        Value::string(&order.shipping_address),
    );
    fields.insert(
        "total_amount".to_string(),
        decimal_to_value(order.total_amount, "total_amount")?,
    );
    fields.insert("status".to_string(), Value::string(order.status.as_str()));
    fields.insert(
        "payment_status".to_string(),
        Value::string(order.payment_status.as_str()),
    );
    fields.insert(
        "created_at".to_string(),
        Value::timestamp(order.created_at),
    );
    Ok(fields)
}

/// Encode a line item into `orders/{id}/items` document fields.
///
/// # Errors
///
/// Returns an error if a price cannot be represented as a double.
pub fn order_item_to_fields(
    item: &OrderItem,
    order_id: &str,
) -> Result<BTreeMap<String, Value>, FirestoreError> {
    let mut fields = BTreeMap::new();
    fields.insert("order_id".to_string(), Value::string(order_id));
    fields.insert(
        "product_id".to_string(),
        Value::string(item.product_id.as_str()),
    );
    fields.insert(
        "variant_id".to_string(),
        Value::string(item.variant_id.as_str()),
    );
    fields.insert(
        "quantity".to_string(),
        Value::integer(i64::from(item.quantity)),
    );
    fields.insert(
        "unit_price".to_string(),
        decimal_to_value(item.unit_price, "unit_price")?,
    );
    fields.insert(
        "subtotal".to_string(),
        decimal_to_value(item.subtotal, "subtotal")?,
    );
    Ok(fields)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ayushyaa_core::{Cart, CartItem, CustomerInfo, OrderNumber};
    use chrono::Utc;

    fn doc(name: &str, fields: Vec<(&str, Value)>) -> Document {
        Document {
            name: Some(format!(
                "projects/p/databases/(default)/documents/{name}"
            )),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            create_time: None,
            update_time: None,
        }
    }

    #[test]
    fn test_product_from_document() {
        let document = doc(
            "products/p1",
            vec![
                ("category_id", Value::string("cat-1")),
                ("name", Value::string("Ragi Laddu")),
                ("slug", Value::string("ragi-laddu")),
                ("description", Value::string("Millet laddu")),
                ("image_url", Value::string("https://cdn.example/r.jpg")),
                ("base_price", Value::double(120.0)),
                ("is_active", Value::boolean(true)),
                ("created_at", Value::string("2024-03-01T10:30:00Z")),
            ],
        );

        let product = product_from_document(&document).unwrap();
        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.base_price, Decimal::from(120));
        assert!(product.is_active);
        assert!(product.created_at.is_some());
        assert!(product.updated_at.is_none());
    }

    #[test]
    fn test_product_missing_name_is_an_error() {
        let document = doc(
            "products/p1",
            vec![
                ("category_id", Value::string("cat-1")),
                ("base_price", Value::double(120.0)),
                ("is_active", Value::boolean(true)),
            ],
        );

        let err = product_from_document(&document).unwrap_err();
        assert!(matches!(
            err,
            FirestoreError::MissingField { field: "name", .. }
        ));
    }

    #[test]
    fn test_variant_prefers_denormalized_id_field() {
        let document = doc(
            "products/p1/variants/v-doc",
            vec![
                ("id", Value::string("p1-250g")),
                ("product_id", Value::string("p1")),
                ("weight", Value::string("250g")),
                ("price", Value::integer(100)),
                ("stock", Value::integer(40)),
                ("is_active", Value::boolean(true)),
            ],
        );

        let variant = variant_from_document(&document, &ProductId::new("p1")).unwrap();
        assert_eq!(variant.id, VariantId::new("p1-250g"));
        // integerValue prices are accepted too
        assert_eq!(variant.price, Decimal::from(100));
        assert_eq!(variant.stock, 40);
    }

    #[test]
    fn test_variant_falls_back_to_parent_product_id() {
        let document = doc(
            "products/p1/variants/v1",
            vec![
                ("weight", Value::string("500g")),
                ("price", Value::double(180.0)),
            ],
        );

        let variant = variant_from_document(&document, &ProductId::new("p1")).unwrap();
        assert_eq!(variant.id, VariantId::new("v1"));
        assert_eq!(variant.product_id, ProductId::new("p1"));
        assert_eq!(variant.stock, 0);
        assert!(variant.is_active);
    }

    #[test]
    fn test_order_fields_round_out_the_document() {
        let mut cart = Cart::new();
        cart.merge(CartItem::new(test_product(), test_variant(), 2));
        let customer = CustomerInfo {
            name: "Asha Rao".to_string(),
            phone: "+91 98450 00000".to_string(),
            email: "asha@example.com".to_string(),
            shipping_address: "12 MG Road".to_string(),
        };
        let (order, items) = Order::assemble(
            &cart,
            &customer,
            OrderNumber::new("AYU1700000000000TEST"),
            Utc::now(),
        );

        let fields = order_to_fields(&order).unwrap();
        assert_eq!(
            fields.get("order_number"),
            Some(&Value::string("AYU1700000000000TEST"))
        );
        assert_eq!(fields.get("status"), Some(&Value::string("pending")));
        assert_eq!(
            fields.get("payment_status"),
            Some(&Value::string("pending"))
        );
        assert_eq!(fields.get("total_amount"), Some(&Value::double(200.0)));

        let item_fields = order_item_to_fields(&items[0], "order-doc-1").unwrap();
        assert_eq!(item_fields.get("order_id"), Some(&Value::string("order-doc-1")));
        assert_eq!(item_fields.get("quantity"), Some(&Value::integer(2)));
        assert_eq!(item_fields.get("subtotal"), Some(&Value::double(200.0)));
    }

    fn test_product() -> Product {
        Product {
            id: ProductId::new("p1"),
            category_id: CategoryId::new("cat-1"),
            name: "Ragi Laddu".to_string(),
            slug: "ragi-laddu".to_string(),
            description: String::new(),
            image_url: String::new(),
            base_price: Decimal::from(100),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn test_variant() -> ProductVariant {
        ProductVariant {
            id: VariantId::new("v1"),
            product_id: ProductId::new("p1"),
            weight: "250g".to_string(),
            price: Decimal::from(100),
            stock: 10,
            is_active: true,
        }
    }
}
