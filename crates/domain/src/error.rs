//! Domain error types.

use store::StoreError;
use thiserror::Error;

use crate::customer::CustomerError;
use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An order request was invalid or referenced a missing product.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A customer registration was invalid.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),
}

impl DomainError {
    /// Returns true if the error was detected before touching the store.
    pub fn is_validation(&self) -> bool {
        match self {
            DomainError::Order(err) => err.is_validation(),
            DomainError::Customer(_) => true,
            DomainError::Store(_) => false,
        }
    }
}
