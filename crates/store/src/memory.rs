use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, ProductId};
use tokio::sync::RwLock;

use crate::{
    Customer, NewCustomer, NewOrderItem, OrderItemRecord, OrderRecord, Product, Result,
    StoreError,
    store::{CustomerStore, OrderStore, OrderTransaction, ProductCatalog},
};

#[derive(Debug, Clone)]
struct OrderRow {
    customer_id: CustomerId,
    order_date: DateTime<Utc>,
    total: Money,
}

#[derive(Debug, Clone)]
struct ItemRow {
    order_id: OrderId,
    item: OrderItemRecord,
}

#[derive(Debug, Default)]
struct StoreState {
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, OrderRow>,
    items: Vec<ItemRow>,
    last_order_id: i32,
    fail_on_begin: bool,
    fail_on_item_insert: bool,
}

/// In-memory order store and product catalog for testing.
///
/// Mirrors the PostgreSQL semantics the order workflow relies on: writes are
/// staged inside the transaction and published on commit, price reads see the
/// latest committed catalog, and order ids come from a sequence that is
/// consumed even when the transaction rolls back.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose catalog holds the given products.
    pub async fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        for product in products {
            store.upsert_product(product).await;
        }
        store
    }

    /// Inserts or replaces a catalog product.
    pub async fn upsert_product(&self, product: Product) {
        self.state
            .write()
            .await
            .products
            .insert(product.id, product);
    }

    /// Removes a catalog product. Returns true if it existed.
    pub async fn remove_product(&self, product_id: ProductId) -> bool {
        self.state
            .write()
            .await
            .products
            .remove(&product_id)
            .is_some()
    }

    /// Returns the number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the number of committed order items.
    pub async fn item_count(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// Returns the id the next inserted order header will receive.
    pub async fn next_order_id(&self) -> OrderId {
        OrderId::new(self.state.read().await.last_order_id + 1)
    }

    /// Configures the store to refuse new transactions.
    pub async fn set_fail_on_begin(&self, fail: bool) {
        self.state.write().await.fail_on_begin = fail;
    }

    /// Configures the store to fail every order item insert.
    pub async fn set_fail_on_item_insert(&self, fail: bool) {
        self.state.write().await.fail_on_item_insert = fail;
    }
}

/// Transaction over an [`InMemoryStore`].
///
/// Headers and items written through it live only in the transaction until
/// commit; dropping it discards them.
pub struct InMemoryTransaction {
    state: Arc<RwLock<StoreState>>,
    orders: BTreeMap<OrderId, OrderRow>,
    items: Vec<ItemRow>,
}

#[async_trait]
impl OrderTransaction for InMemoryTransaction {
    async fn insert_order_header(&mut self, customer_id: CustomerId) -> Result<OrderId> {
        let order_id = {
            let mut state = self.state.write().await;
            state.last_order_id = state
                .last_order_id
                .checked_add(1)
                .ok_or_else(|| StoreError::Unavailable("order id sequence exhausted".to_string()))?;
            OrderId::new(state.last_order_id)
        };

        self.orders.insert(
            order_id,
            OrderRow {
                customer_id,
                order_date: Utc::now(),
                total: Money::zero(),
            },
        );
        Ok(order_id)
    }

    async fn product_price(&mut self, product_id: ProductId) -> Result<Option<Money>> {
        let state = self.state.read().await;
        Ok(state.products.get(&product_id).map(|p| p.price))
    }

    async fn insert_order_item(&mut self, order_id: OrderId, item: NewOrderItem) -> Result<()> {
        if self.state.read().await.fail_on_item_insert {
            return Err(StoreError::Unavailable(
                "order item insert rejected".to_string(),
            ));
        }
        if !self.orders.contains_key(&order_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "order {order_id} does not exist"
            )));
        }

        self.items.push(ItemRow {
            order_id,
            item: OrderItemRecord {
                product_id: item.product_id,
                quantity: item.quantity,
                subtotal: item.subtotal,
            },
        });
        Ok(())
    }

    async fn update_order_total(&mut self, order_id: OrderId, total: Money) -> Result<()> {
        let order = self.orders.get_mut(&order_id).ok_or_else(|| {
            StoreError::ConstraintViolation(format!("order {order_id} does not exist"))
        })?;
        order.total = total;
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        let mut state = self.state.write().await;
        state.orders.extend(self.orders);
        state.items.extend(self.items);
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction> {
        if self.state.read().await.fail_on_begin {
            return Err(StoreError::Unavailable(
                "connection pool exhausted".to_string(),
            ));
        }

        Ok(InMemoryTransaction {
            state: Arc::clone(&self.state),
            orders: BTreeMap::new(),
            items: Vec::new(),
        })
    }

    async fn list_orders_with_items(&self) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        let orders = state
            .orders
            .iter()
            .map(|(id, row)| OrderRecord {
                id: *id,
                customer_id: row.customer_id,
                order_date: row.order_date,
                total: row.total,
                items: state
                    .items
                    .iter()
                    .filter(|i| i.order_id == *id)
                    .map(|i| i.item)
                    .collect(),
            })
            .collect();
        Ok(orders)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }
}

/// In-memory customer store for testing.
///
/// Identity numbers are kept as given; encryption at rest is a property of
/// the PostgreSQL store only.
#[derive(Clone, Default)]
pub struct InMemoryCustomerStore {
    state: Arc<RwLock<CustomerState>>,
}

#[derive(Debug, Default)]
struct CustomerState {
    customers: Vec<Customer>,
    last_customer_id: i32,
}

impl InMemoryCustomerStore {
    /// Creates a new empty customer store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored customers.
    pub async fn customer_count(&self) -> usize {
        self.state.read().await.customers.len()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        Ok(self.state.read().await.customers.clone())
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerId> {
        let mut state = self.state.write().await;

        // Mirrors the UNIQUE constraint on customers.email.
        if state.customers.iter().any(|c| c.email == customer.email) {
            return Err(StoreError::ConstraintViolation(format!(
                "email {} already registered",
                customer.email
            )));
        }

        state.last_customer_id = state.last_customer_id.checked_add(1).ok_or_else(|| {
            StoreError::Unavailable("customer id sequence exhausted".to_string())
        })?;
        let id = CustomerId::new(state.last_customer_id);
        state.customers.push(Customer {
            id,
            full_name: customer.full_name,
            email: customer.email,
            identity_number: customer.identity_number,
        });
        Ok(id)
    }
}
