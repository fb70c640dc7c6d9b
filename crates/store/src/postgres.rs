use async_trait::async_trait;
use common::{CustomerId, Money, OrderId, ProductId};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    Customer, NewCustomer, NewOrderItem, OrderItemRecord, OrderRecord, Product, Result,
    StoreError,
    store::{CustomerStore, OrderStore, OrderTransaction, ProductCatalog},
};

/// PostgreSQL-backed order store and product catalog.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<OrderRecord> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<ItemRow> = serde_json::from_value(items_json)?;

        Ok(OrderRecord {
            id: OrderId::new(row.try_get("id")?),
            customer_id: CustomerId::new(row.try_get("customer_id")?),
            order_date: row.try_get("order_date")?,
            total: Money::from_cents(row.try_get("total_cents")?),
            items: items.into_iter().map(OrderItemRecord::from).collect(),
        })
    }
}

/// Line item as aggregated by `json_agg` in the listing query.
#[derive(Deserialize)]
struct ItemRow {
    product_id: i32,
    quantity: u32,
    subtotal_cents: i64,
}

impl From<ItemRow> for OrderItemRecord {
    fn from(row: ItemRow) -> Self {
        OrderItemRecord {
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            subtotal: Money::from_cents(row.subtotal_cents),
        }
    }
}

/// An open PostgreSQL transaction on a dedicated pooled connection.
///
/// Dropping it without committing returns the connection to the pool with the
/// transaction rolled back.
pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
    async fn insert_order_header(&mut self, customer_id: CustomerId) -> Result<OrderId> {
        let id: i32 =
            sqlx::query_scalar("INSERT INTO orders (customer_id, total) VALUES ($1, 0) RETURNING id")
                .bind(customer_id.as_i32())
                .fetch_one(&mut *self.tx)
                .await?;

        Ok(OrderId::new(id))
    }

    async fn product_price(&mut self, product_id: ProductId) -> Result<Option<Money>> {
        let cents: Option<i64> =
            sqlx::query_scalar("SELECT (price * 100)::BIGINT FROM products WHERE id = $1")
                .bind(product_id.as_i32())
                .fetch_optional(&mut *self.tx)
                .await?;

        Ok(cents.map(Money::from_cents))
    }

    async fn insert_order_item(&mut self, order_id: OrderId, item: NewOrderItem) -> Result<()> {
        let quantity = i32::try_from(item.quantity).map_err(|_| {
            StoreError::ConstraintViolation(format!("quantity {} out of range", item.quantity))
        })?;

        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, subtotal)
            VALUES ($1, $2, $3, $4::NUMERIC / 100)
            "#,
        )
        .bind(order_id.as_i32())
        .bind(item.product_id.as_i32())
        .bind(quantity)
        .bind(item.subtotal.cents())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn update_order_total(&mut self, order_id: OrderId, total: Money) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET total = $1::NUMERIC / 100 WHERE id = $2")
            .bind(total.cents())
            .bind(order_id.as_i32())
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ConstraintViolation(format!(
                "order {order_id} does not exist"
            )));
        }
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    type Transaction = PgOrderTransaction;

    async fn begin(&self) -> Result<PgOrderTransaction> {
        let tx = self.pool.begin().await?;
        Ok(PgOrderTransaction { tx })
    }

    async fn list_orders_with_items(&self) -> Result<Vec<OrderRecord>> {
        // LEFT JOIN keeps orders that have no items; FILTER drops the NULL row
        // the join produces for them.
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.customer_id, o.order_date, (o.total * 100)::BIGINT AS total_cents,
                   COALESCE(
                       json_agg(
                           json_build_object(
                               'product_id', i.product_id,
                               'quantity', i.quantity,
                               'subtotal_cents', (i.subtotal * 100)::BIGINT
                           ) ORDER BY i.id
                       ) FILTER (WHERE i.id IS NOT NULL),
                       '[]'::json
                   ) AS items
            FROM orders o
            LEFT JOIN order_items i ON o.id = i.order_id
            GROUP BY o.id
            ORDER BY o.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}

#[async_trait]
impl ProductCatalog for PostgresStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, (price * 100)::BIGINT AS price_cents
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Product {
                    id: ProductId::new(row.try_get("id")?),
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    price: Money::from_cents(row.try_get("price_cents")?),
                })
            })
            .collect()
    }
}

/// PostgreSQL-backed customer store.
///
/// Identity numbers are encrypted with `pgp_sym_encrypt` (pgcrypto) using the
/// configured key and decrypted on read.
#[derive(Clone)]
pub struct PostgresCustomerStore {
    pool: PgPool,
    encryption_key: String,
}

impl PostgresCustomerStore {
    /// Creates a new customer store using `encryption_key` for identity numbers.
    pub fn new(pool: PgPool, encryption_key: impl Into<String>) -> Self {
        Self {
            pool,
            encryption_key: encryption_key.into(),
        }
    }
}

impl std::fmt::Debug for PostgresCustomerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCustomerStore")
            .field("encryption_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, full_name, email, pgp_sym_decrypt(identity_number, $1) AS identity_number
            FROM customers
            ORDER BY id ASC
            "#,
        )
        .bind(&self.encryption_key)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Customer {
                    id: CustomerId::new(row.try_get("id")?),
                    full_name: row.try_get("full_name")?,
                    email: row.try_get("email")?,
                    identity_number: row.try_get("identity_number")?,
                })
            })
            .collect()
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerId> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO customers (full_name, email, identity_number)
            VALUES ($1, $2, pgp_sym_encrypt($3, $4))
            RETURNING id
            "#,
        )
        .bind(&customer.full_name)
        .bind(&customer.email)
        .bind(&customer.identity_number)
        .bind(&self.encryption_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(CustomerId::new(id))
    }
}
