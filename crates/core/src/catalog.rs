//! Read-only catalog models: categories, products, and their variants.
//!
//! These types mirror the backend documents. The storefront never mutates
//! them; they are written by the (out-of-scope) admin tool.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CategoryId, ProductId, VariantId};

/// A product category. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Category {
    /// The synthetic placeholder assigned to products whose category
    /// reference does not resolve. Availability is favored over strict
    /// referential integrity.
    #[must_use]
    pub fn uncategorized() -> Self {
        Self {
            id: CategoryId::new(""),
            name: "Uncategorized".to_string(),
            slug: "uncategorized".to_string(),
            description: String::new(),
            created_at: None,
        }
    }
}

/// A product as stored in the backend. Immutable from the storefront's
/// perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image_url: String,
    pub base_price: Decimal,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A purchasable size/weight option of a product, carrying its own price
/// and stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    /// Weight/size label, e.g. `"250g"`.
    pub weight: String,
    pub price: Decimal,
    pub stock: i64,
    pub is_active: bool,
}

/// Error returned when a product arrives from the backend without any
/// variants.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("product {product_id} has no variants")]
pub struct NoVariants {
    pub product_id: ProductId,
}

/// The denormalized product view assembled for display: a product joined
/// with its resolved category and its full variant list.
///
/// The variant set is non-empty by construction; use
/// [`ProductWithVariants::new`] to enforce this at assembly time instead of
/// letting display code fail on an empty-set minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithVariants {
    pub product: Product,
    pub category: Category,
    variants: Vec<ProductVariant>,
}

impl ProductWithVariants {
    /// Assemble the denormalized view.
    ///
    /// # Errors
    ///
    /// Returns [`NoVariants`] if `variants` is empty.
    pub fn new(
        product: Product,
        category: Category,
        variants: Vec<ProductVariant>,
    ) -> Result<Self, NoVariants> {
        if variants.is_empty() {
            return Err(NoVariants {
                product_id: product.id,
            });
        }
        Ok(Self {
            product,
            category,
            variants,
        })
    }

    /// The product's variants. Guaranteed non-empty.
    #[must_use]
    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    /// The cheapest variant price, used for "from ₹X" display.
    #[must_use]
    pub fn min_price(&self) -> Decimal {
        self.variants
            .iter()
            .map(|v| v.price)
            .min()
            .unwrap_or(self.product.base_price)
    }
}
