//! Structured query types for `runQuery`.
//!
//! Only the slice of the query surface the storefront uses is modeled: a
//! single-collection selector with an optional equality filter.

use serde::Serialize;

use super::documents::Value;

/// A Firestore structured query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
}

impl StructuredQuery {
    /// Query all documents of one collection.
    #[must_use]
    pub fn collection(collection_id: impl Into<String>) -> Self {
        Self {
            from: vec![CollectionSelector {
                collection_id: collection_id.into(),
            }],
            filter: None,
        }
    }

    /// Restrict the query to documents whose `field` equals `value`.
    #[must_use]
    pub fn with_eq_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filter = Some(Filter::FieldFilter(FieldFilter {
            field: FieldReference {
                field_path: field.into(),
            },
            op: FilterOp::Equal,
            value,
        }));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
enum Filter {
    FieldFilter(FieldFilter),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldFilter {
    field: FieldReference,
    op: FilterOp,
    value: Value,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum FilterOp {
    Equal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_active_products_query_wire_shape() {
        let query = StructuredQuery::collection("products")
            .with_eq_filter("is_active", Value::boolean(true));
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "from": [{"collectionId": "products"}],
                "where": {
                    "fieldFilter": {
                        "field": {"fieldPath": "is_active"},
                        "op": "EQUAL",
                        "value": {"booleanValue": true}
                    }
                }
            })
        );
    }

    #[test]
    fn test_unfiltered_query_omits_where() {
        let query = StructuredQuery::collection("categories");
        let json = serde_json::to_value(&query).unwrap();
        assert!(json.get("where").is_none());
    }
}
