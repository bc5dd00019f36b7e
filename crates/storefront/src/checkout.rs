//! Checkout: converting the current cart into durable order records.
//!
//! One submission writes the order document and every line item in a single
//! atomic Firestore commit, so an order can never land with only some of
//! its items. On success the cart store is cleared (which notifies the UI);
//! on failure nothing was written and the cart is left intact for a retry.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use ayushyaa_core::{CustomerInfo, Order, OrderNumber};

use crate::cart::{CartStore, CartStoreError};
use crate::firestore::{
    FirestoreClient, FirestoreError, Write, order_item_to_fields, order_to_fields,
};

/// Brand prefix on every order number.
pub const ORDER_NUMBER_PREFIX: &str = "AYU";

/// Length of the random suffix that makes same-millisecond submissions
/// collision-resistant.
const ORDER_NUMBER_SUFFIX_LEN: usize = 4;

/// Errors from an order submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items; there is nothing to submit.
    #[error("cannot submit an order for an empty cart")]
    EmptyCart,

    /// The backend rejected or failed the order write. Nothing was
    /// persisted - the commit is atomic.
    #[error("backend error: {0}")]
    Backend(#[from] FirestoreError),

    /// The order was persisted but clearing the local cart failed.
    #[error("order persisted but cart could not be cleared: {0}")]
    CartClear(#[from] CartStoreError),
}

/// Assembles and persists orders from the current cart.
#[derive(Clone)]
pub struct CheckoutService {
    client: FirestoreClient,
    cart: CartStore,
}

impl CheckoutService {
    #[must_use]
    pub const fn new(client: FirestoreClient, cart: CartStore) -> Self {
        Self { client, cart }
    }

    /// Submit an order for the current cart contents.
    ///
    /// The total is taken from the in-memory cart snapshot, not re-queried
    /// from the backend. Status and payment status both start at `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart and
    /// [`CheckoutError::Backend`] if the atomic write fails; in the latter
    /// case the cart is untouched and the submission can be retried.
    #[instrument(skip(self, customer), fields(customer_email = %customer.email))]
    pub async fn submit_order(
        &self,
        customer: &CustomerInfo,
    ) -> Result<OrderNumber, CheckoutError> {
        let cart = self.cart.get();
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order_number = generate_order_number();
        let (order, items) = Order::assemble(&cart, customer, order_number.clone(), Utc::now());

        // Client-generated document IDs let the order and its items go into
        // one commit; the exists=false preconditions make it a pure create.
        let order_doc_id = Uuid::new_v4().simple().to_string();
        let mut writes = Vec::with_capacity(items.len() + 1);
        writes.push(Write::create(
            self.client.document_name(&format!("orders/{order_doc_id}")),
            order_to_fields(&order)?,
        ));
        for item in &items {
            let item_doc_id = Uuid::new_v4().simple().to_string();
            writes.push(Write::create(
                self.client
                    .document_name(&format!("orders/{order_doc_id}/items/{item_doc_id}")),
                order_item_to_fields(item, &order_doc_id)?,
            ));
        }

        self.client.commit(writes).await?;

        self.cart.clear()?;
        info!(
            order_number = %order_number,
            item_count = items.len(),
            total = %order.total_amount,
            "order submitted"
        );
        Ok(order_number)
    }
}

/// Generate an order number: brand prefix, millisecond timestamp, and a
/// short random suffix. Time-sortable like the original numbers, but safe
/// under rapid repeat submissions.
fn generate_order_number() -> OrderNumber {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ORDER_NUMBER_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    OrderNumber::new(format!("{ORDER_NUMBER_PREFIX}{millis}{suffix}"))
}
