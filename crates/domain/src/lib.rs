//! Domain layer for the storefront services.
//!
//! This crate provides:
//! - `OrderService`: transactional order creation and order listing
//! - `CustomerService`: customer registration with field validation
//! - the validation and error types shared with the HTTP layer

pub mod customer;
pub mod error;
pub mod order;

pub use customer::{CustomerError, CustomerService, RegisterCustomer};
pub use error::DomainError;
pub use order::{
    CreateOrder, OrderCreated, OrderError, OrderLine, OrderService, ValidatedLine, ValidatedOrder,
};
