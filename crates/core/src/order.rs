//! Order assembly: converting a cart snapshot into durable order records.
//!
//! An [`Order`] plus its [`OrderItem`]s are priced snapshots, decoupled from
//! future product or variant price changes. Once written to the backend they
//! are never mutated by the storefront.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::{OrderStatus, PaymentStatus, ProductId, VariantId};

/// A human-readable order number, e.g. `AYU1714059371123KX7Q`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer contact and shipping fields collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub shipping_address: String,
}

/// The durable order record created at checkout.
///
/// `total_amount` equals the sum of the line items' subtotals at creation
/// time; [`Order::assemble`] guarantees this by computing both from the same
/// cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: OrderNumber,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub shipping_address: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// A priced snapshot of one cart entry, belonging to exactly one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// `unit_price × quantity`, computed at assembly time.
    pub subtotal: Decimal,
}

impl Order {
    /// Assemble an order and its line items from a cart snapshot.
    ///
    /// Both statuses start at `pending`. The total is taken from the cart
    /// passed in, not re-queried from the backend.
    #[must_use]
    pub fn assemble(
        cart: &Cart,
        customer: &CustomerInfo,
        order_number: OrderNumber,
        placed_at: DateTime<Utc>,
    ) -> (Self, Vec<OrderItem>) {
        let items: Vec<OrderItem> = cart
            .items()
            .iter()
            .map(|entry| OrderItem {
                product_id: entry.product.id.clone(),
                variant_id: entry.variant.id.clone(),
                quantity: entry.quantity,
                unit_price: entry.variant.price,
                subtotal: entry.line_total(),
            })
            .collect();

        let order = Self {
            order_number,
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            customer_email: customer.email.clone(),
            shipping_address: customer.shipping_address.clone(),
            total_amount: cart.total(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: placed_at,
        };

        (order, items)
    }
}
