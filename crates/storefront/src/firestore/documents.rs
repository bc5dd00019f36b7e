//! Wire types for the Firestore REST v1 API.
//!
//! Firestore documents are maps of field name to a tagged `Value` union
//! (`{"stringValue": "x"}`, `{"integerValue": "42"}`, ...). Integers travel
//! as strings on the wire to survive JSON number precision limits.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Firestore document: a named map of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, e.g.
    /// `projects/p/databases/(default)/documents/products/abc123`.
    /// Absent on documents that have not been written yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// Create an unnamed document from fields (for creates).
    #[must_use]
    pub const fn from_fields(fields: BTreeMap<String, Value>) -> Self {
        Self {
            name: None,
            fields,
            create_time: None,
            update_time: None,
        }
    }

    /// The document ID: the last segment of the resource name.
    #[must_use]
    pub fn doc_id(&self) -> Option<&str> {
        self.name.as_deref()?.rsplit('/').next()
    }

    /// Look up a field value by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// The Firestore value union.
///
/// Serde's external tagging matches the wire shape exactly: each variant
/// serializes as a single-key object keyed by the Firestore type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    /// Int64, string-encoded on the wire.
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    MapValue(MapValue),
    ArrayValue(ArrayValue),
}

/// A nested map value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

/// An array value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

impl Value {
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::IntegerValue(value.to_string())
    }

    #[must_use]
    pub const fn double(value: f64) -> Self {
        Self::DoubleValue(value)
    }

    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::BooleanValue(value)
    }

    #[must_use]
    pub const fn timestamp(value: DateTime<Utc>) -> Self {
        Self::TimestampValue(value)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::IntegerValue(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Numeric access: accepts both doubles and (string-encoded) integers,
    /// since the admin tool is free to write prices either way.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::DoubleValue(d) => Some(*d),
            Self::IntegerValue(s) => s.parse::<i64>().ok().map(|i| i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::BooleanValue(b) => Some(*b),
            _ => None,
        }
    }

    /// Timestamp access: accepts a `timestampValue` or an RFC 3339 string,
    /// matching both ways the admin tool has stored `created_at`.
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::TimestampValue(t) => Some(*t),
            Self::StringValue(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }
}

// =============================================================================
// Batch writes
// =============================================================================

/// One write in a `commit` batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Write {
    pub update: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_document: Option<Precondition>,
}

impl Write {
    /// A create: writes `document` at `name` and fails the whole commit if a
    /// document already exists there.
    #[must_use]
    pub fn create(name: String, fields: BTreeMap<String, Value>) -> Self {
        Self {
            update: Document {
                name: Some(name),
                fields,
                create_time: None,
                update_time: None,
            },
            current_document: Some(Precondition { exists: false }),
        }
    }
}

/// A write precondition.
#[derive(Debug, Clone, Serialize)]
pub struct Precondition {
    pub exists: bool,
}
