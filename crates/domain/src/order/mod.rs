//! Order creation and listing.

mod commands;
mod service;

pub use commands::{CreateOrder, OrderCreated, OrderLine, ValidatedLine, ValidatedOrder};
pub use service::OrderService;

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Customer ID is required.
    #[error("Customer ID is required")]
    CustomerIdRequired,

    /// Customer ID must be a positive identifier.
    #[error("Invalid customer ID: {customer_id}")]
    InvalidCustomerId { customer_id: i32 },

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    /// Invalid quantity.
    #[error("Invalid quantity {quantity} for product {product_id} (must be greater than 0)")]
    InvalidQuantity { product_id: ProductId, quantity: i64 },

    /// A referenced product does not exist at lookup time.
    #[error("Product {product_id} not found")]
    ProductNotFound { product_id: ProductId },

    /// A subtotal or the running total exceeded the representable amount.
    #[error("Order amount overflow at product {product_id}")]
    AmountOverflow { product_id: ProductId },
}

impl OrderError {
    /// Returns true for request-shape errors caught before any store access.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            OrderError::ProductNotFound { .. } | OrderError::AmountOverflow { .. }
        )
    }
}
