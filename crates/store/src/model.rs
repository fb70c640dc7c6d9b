//! Rows read from and written to the store.

use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, ProductId};

/// A catalog product. Read-only from the order workflow's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
}

impl Product {
    /// Creates a product with no description.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            price,
        }
    }
}

/// A line item to persist as part of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price at the time of the order multiplied by `quantity`.
    pub subtotal: Money,
}

/// A persisted line item as returned by order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub product_id: ProductId,
    pub quantity: u32,
    pub subtotal: Money,
}

/// A persisted order header with its embedded line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub total: Money,
    pub items: Vec<OrderItemRecord>,
}

/// A customer with the identity number already decrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub full_name: String,
    pub email: String,
    pub identity_number: String,
}

/// Fields required to register a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub full_name: String,
    pub email: String,
    /// Plaintext; encrypted by the store before it reaches disk.
    pub identity_number: String,
}
