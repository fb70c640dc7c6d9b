//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::sync::Arc;

use common::{CustomerId, Money, OrderId, ProductId};
use serial_test::serial;
use sqlx::PgPool;
use store::{
    CustomerStore, NewCustomer, NewOrderItem, OrderStore, OrderTransaction, PostgresCustomerStore,
    PostgresStore, ProductCatalog, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

const ENCRYPTION_KEY: &str = "integration-test-key";

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_storefront_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared tables
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE order_items, orders, customers, products RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

async fn seed_customer(pool: &PgPool, email: &str) -> CustomerId {
    let store = PostgresCustomerStore::new(pool.clone(), ENCRYPTION_KEY);
    store
        .create_customer(NewCustomer {
            full_name: "Test Customer".to_string(),
            email: email.to_string(),
            identity_number: "0102030405".to_string(),
        })
        .await
        .unwrap()
}

async fn seed_product(pool: &PgPool, name: &str, price: &str) -> ProductId {
    let id: i32 =
        sqlx::query_scalar("INSERT INTO products (name, price) VALUES ($1, $2::NUMERIC) RETURNING id")
            .bind(name)
            .bind(price)
            .fetch_one(pool)
            .await
            .unwrap();
    ProductId::new(id)
}

#[tokio::test]
#[serial]
async fn committed_order_is_listed_with_items() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool.clone());
    let customer_id = seed_customer(&pool, "a@example.com").await;
    let product_id = seed_product(&pool, "Keyboard", "10.00").await;

    let mut tx = store.begin().await.unwrap();
    let order_id = tx.insert_order_header(customer_id).await.unwrap();
    let price = tx.product_price(product_id).await.unwrap().unwrap();
    assert_eq!(price, Money::from_cents(1000));

    tx.insert_order_item(
        order_id,
        NewOrderItem {
            product_id,
            quantity: 3,
            subtotal: price.checked_mul(3).unwrap(),
        },
    )
    .await
    .unwrap();
    tx.update_order_total(order_id, price.checked_mul(3).unwrap())
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let orders = store.list_orders_with_items().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order_id);
    assert_eq!(orders[0].customer_id, customer_id);
    assert_eq!(orders[0].total, Money::from_cents(3000));
    assert_eq!(orders[0].items.len(), 1);
    assert_eq!(orders[0].items[0].product_id, product_id);
    assert_eq!(orders[0].items[0].quantity, 3);
    assert_eq!(orders[0].items[0].subtotal, Money::from_cents(3000));
}

#[tokio::test]
#[serial]
async fn uncommitted_writes_are_invisible_and_dropped() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool.clone());
    let customer_id = seed_customer(&pool, "b@example.com").await;

    {
        let mut tx = store.begin().await.unwrap();
        tx.insert_order_header(customer_id).await.unwrap();

        // Another connection must not see the in-flight header.
        assert!(store.list_orders_with_items().await.unwrap().is_empty());
    }

    assert!(store.list_orders_with_items().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn explicit_rollback_discards_header_and_items() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool.clone());
    let customer_id = seed_customer(&pool, "c@example.com").await;
    let product_id = seed_product(&pool, "Mouse", "5.50").await;

    let mut tx = store.begin().await.unwrap();
    let order_id = tx.insert_order_header(customer_id).await.unwrap();
    tx.insert_order_item(
        order_id,
        NewOrderItem {
            product_id,
            quantity: 1,
            subtotal: Money::from_cents(550),
        },
    )
    .await
    .unwrap();
    tx.rollback().await.unwrap();

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(items, 0);
    assert!(store.list_orders_with_items().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn unknown_customer_violates_foreign_key() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool);

    let mut tx = store.begin().await.unwrap();
    let result = tx.insert_order_header(CustomerId::new(4242)).await;
    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[tokio::test]
#[serial]
async fn missing_product_has_no_price() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool);

    let mut tx = store.begin().await.unwrap();
    assert_eq!(tx.product_price(ProductId::new(999)).await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn update_total_of_missing_order_is_rejected() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool);

    let mut tx = store.begin().await.unwrap();
    let result = tx
        .update_order_total(OrderId::new(999), Money::from_cents(100))
        .await;
    assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
}

#[tokio::test]
#[serial]
async fn orders_without_items_are_listed_in_id_order() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool.clone());
    let customer_id = seed_customer(&pool, "d@example.com").await;

    for _ in 0..3 {
        let mut tx = store.begin().await.unwrap();
        tx.insert_order_header(customer_id).await.unwrap();
        tx.commit().await.unwrap();
    }

    let orders = store.list_orders_with_items().await.unwrap();
    let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(orders.iter().all(|o| o.items.is_empty()));
}

#[tokio::test]
#[serial]
async fn catalog_lists_products_with_exact_prices() {
    let pool = get_test_pool().await;
    let store = PostgresStore::new(pool.clone());
    seed_product(&pool, "Cable", "19.99").await;
    seed_product(&pool, "Adapter", "0.05").await;

    let products = store.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Cable");
    assert_eq!(products[0].price, Money::from_cents(1999));
    assert_eq!(products[1].price, Money::from_cents(5));
}

#[tokio::test]
#[serial]
async fn customer_identity_number_is_encrypted_at_rest() {
    let pool = get_test_pool().await;
    let store = PostgresCustomerStore::new(pool.clone(), ENCRYPTION_KEY);
    let id = seed_customer(&pool, "e@example.com").await;

    let raw: Vec<u8> = sqlx::query_scalar("SELECT identity_number FROM customers WHERE id = $1")
        .bind(id.as_i32())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(raw, b"0102030405".to_vec());

    let customers = store.list_customers().await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].identity_number, "0102030405");
    assert_eq!(customers[0].email, "e@example.com");
}
