use async_trait::async_trait;
use common::{CustomerId, Money, OrderId, ProductId};

use crate::{Customer, NewCustomer, NewOrderItem, OrderRecord, Product, Result};

/// A unit of work against the order tables.
///
/// All writes made through a transaction stay invisible to other readers until
/// [`commit`](OrderTransaction::commit) succeeds. Implementations must roll
/// back when the value is dropped without being committed.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Inserts an order header with a total of zero and returns its identifier.
    async fn insert_order_header(&mut self, customer_id: CustomerId) -> Result<OrderId>;

    /// Reads the current unit price of a product.
    ///
    /// Returns None if the product doesn't exist.
    async fn product_price(&mut self, product_id: ProductId) -> Result<Option<Money>>;

    /// Inserts a line item belonging to an order created in this transaction.
    async fn insert_order_item(&mut self, order_id: OrderId, item: NewOrderItem) -> Result<()>;

    /// Overwrites the total of an order header.
    async fn update_order_total(&mut self, order_id: OrderId, total: Money) -> Result<()>;

    /// Makes every write of this transaction visible atomically.
    async fn commit(self) -> Result<()>;

    /// Discards every write of this transaction.
    async fn rollback(self) -> Result<()>;
}

/// Storage for orders and their line items.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// The transaction handle handed out by [`begin`](OrderStore::begin).
    type Transaction: OrderTransaction;

    /// Starts a transaction holding one dedicated connection until it ends.
    async fn begin(&self) -> Result<Self::Transaction>;

    /// Lists every order with its line items, ordered by order id ascending.
    ///
    /// Items are ordered by insertion. Orders without items are included with
    /// an empty item list.
    async fn list_orders_with_items(&self) -> Result<Vec<OrderRecord>>;
}

/// Read access to the product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Lists all products ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>>;
}

/// Storage for customers. Identity numbers are encrypted at rest.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Lists all customers with identity numbers decrypted.
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Persists a new customer and returns its identifier.
    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerId>;
}
