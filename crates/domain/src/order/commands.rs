//! Order commands.

use common::{CustomerId, Money, OrderId, ProductId};
use store::NewOrderItem;

use super::OrderError;

/// A requested product and quantity, as received from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Command to create an order with its line items in one step.
#[derive(Debug, Clone, Default)]
pub struct CreateOrder {
    /// The customer placing the order.
    pub customer_id: Option<CustomerId>,

    /// Requested items, processed in the given order.
    pub items: Vec<OrderLine>,
}

impl CreateOrder {
    /// Creates a new CreateOrder command.
    pub fn new(customer_id: impl Into<CustomerId>, items: Vec<OrderLine>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            items,
        }
    }

    /// Checks the request shape without touching the store.
    pub fn validate(self) -> Result<ValidatedOrder, OrderError> {
        let customer_id = self.customer_id.ok_or(OrderError::CustomerIdRequired)?;
        if customer_id.as_i32() <= 0 {
            return Err(OrderError::InvalidCustomerId {
                customer_id: customer_id.as_i32(),
            });
        }
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }

        let lines = self
            .items
            .into_iter()
            .map(|line| {
                // Quantities are stored in an INTEGER column.
                let quantity = i32::try_from(line.quantity)
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or(OrderError::InvalidQuantity {
                        product_id: line.product_id,
                        quantity: line.quantity,
                    })?;
                Ok(ValidatedLine {
                    product_id: line.product_id,
                    quantity: quantity as u32,
                })
            })
            .collect::<Result<Vec<_>, OrderError>>()?;

        Ok(ValidatedOrder { customer_id, lines })
    }
}

/// A line whose quantity has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An order request that passed validation and may be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub customer_id: CustomerId,
    pub lines: Vec<ValidatedLine>,
}

/// Outcome of a committed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreated {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub total: Money,
    /// Persisted items in input order, with their price snapshots.
    pub items: Vec<NewOrderItem>,
}
