//! Customers service entry point.

use std::sync::Arc;

use api::config::Config;
use api::routes::customers::CustomersState;
use domain::CustomerService;
use store::{PostgresCustomerStore, PostgresStore};

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    api::telemetry::init_tracing(&config);

    // Refuse to start rather than store identity numbers without a key.
    let encryption_key = config
        .require_encryption_key()
        .expect("invalid configuration")
        .to_string();

    let metrics_handle =
        api::telemetry::install_metrics().expect("failed to install Prometheus recorder");

    let pool = api::server::connect_pool(&config.database)
        .await
        .expect("failed to connect to database");
    if config.run_migrations {
        PostgresStore::new(pool.clone())
            .run_migrations()
            .await
            .expect("failed to run migrations");
    }

    let store = PostgresCustomerStore::new(pool.clone(), encryption_key);
    let state = Arc::new(CustomersState::new(CustomerService::new(store)));
    let app = api::customers_app(state, metrics_handle);

    api::server::serve(app, &config.addr())
        .await
        .expect("server error");

    pool.close().await;
    tracing::info!("customers service shut down gracefully");
}
