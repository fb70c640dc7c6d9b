//! Order service providing transactional order creation.

use std::time::Instant;

use common::Money;
use store::{NewOrderItem, OrderRecord, OrderStore, OrderTransaction};

use crate::error::DomainError;

use super::{CreateOrder, OrderCreated, OrderError, ValidatedOrder};

/// Service for creating and listing orders.
///
/// An order header and all of its line items are written in a single store
/// transaction: either the whole order becomes visible with its final total,
/// or nothing does.
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates the request, then prices and persists the order atomically.
    ///
    /// Validation failures return before a transaction is opened. Any failure
    /// after that rolls the transaction back. No retries are attempted.
    #[tracing::instrument(
        skip(self, cmd),
        fields(customer_id = ?cmd.customer_id, item_count = cmd.items.len())
    )]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<OrderCreated, DomainError> {
        let order = cmd.validate().inspect_err(|err| {
            metrics::counter!("orders_rejected_total").increment(1);
            tracing::debug!(error = %err, "order request rejected");
        })?;

        let started = Instant::now();
        let result = self.place_order(&order).await;

        match &result {
            Ok(created) => {
                metrics::counter!("orders_created_total").increment(1);
                metrics::histogram!("order_creation_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(
                    order_id = %created.order_id,
                    total = %created.total,
                    "order created"
                );
            }
            Err(err) => {
                metrics::counter!("orders_failed_total").increment(1);
                tracing::warn!(error = %err, "order creation rolled back");
            }
        }

        result
    }

    /// Lists every order with its items, ordered by order id.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>, DomainError> {
        Ok(self.store.list_orders_with_items().await?)
    }

    async fn place_order(&self, order: &ValidatedOrder) -> Result<OrderCreated, DomainError> {
        let mut tx = self.store.begin().await?;

        // If this future is dropped mid-way, dropping `tx` rolls it back.
        let written = write_order(&mut tx, order).await;
        match written {
            Ok(created) => {
                tx.commit().await?;
                Ok(created)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// Writes the header, prices each line in input order and stores the total.
async fn write_order<T: OrderTransaction>(
    tx: &mut T,
    order: &ValidatedOrder,
) -> Result<OrderCreated, DomainError> {
    let order_id = tx.insert_order_header(order.customer_id).await?;

    let mut total = Money::zero();
    let mut items = Vec::with_capacity(order.lines.len());

    for line in &order.lines {
        let price = tx
            .product_price(line.product_id)
            .await?
            .ok_or(OrderError::ProductNotFound {
                product_id: line.product_id,
            })?;

        let (subtotal, running_total) = price
            .checked_mul(line.quantity)
            .and_then(|subtotal| total.checked_add(subtotal).map(|sum| (subtotal, sum)))
            .ok_or(OrderError::AmountOverflow {
                product_id: line.product_id,
            })?;
        total = running_total;

        let item = NewOrderItem {
            product_id: line.product_id,
            quantity: line.quantity,
            subtotal,
        };

        tx.insert_order_item(order_id, item).await?;
        items.push(item);
    }

    tx.update_order_total(order_id, total).await?;

    Ok(OrderCreated {
        order_id,
        customer_id: order.customer_id,
        total,
        items,
    })
}
