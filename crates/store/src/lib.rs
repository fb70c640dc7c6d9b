//! Persistence boundary for the storefront services.
//!
//! The order workflow talks to the database through [`OrderStore`] and the
//! transaction handle it hands out, [`OrderTransaction`]. A transaction that
//! is dropped without [`OrderTransaction::commit`] is rolled back, so every
//! exit path (early `?` returns, task cancellation) discards partial writes.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::{InMemoryCustomerStore, InMemoryStore, InMemoryTransaction};
pub use model::{Customer, NewCustomer, NewOrderItem, OrderItemRecord, OrderRecord, Product};
pub use postgres::{PgOrderTransaction, PostgresCustomerStore, PostgresStore};
pub use store::{CustomerStore, OrderStore, OrderTransaction, ProductCatalog};
