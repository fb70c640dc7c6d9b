//! Orders service entry point.

use std::sync::Arc;

use api::config::Config;
use api::routes::orders::AppState;
use domain::OrderService;
use store::PostgresStore;

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    api::telemetry::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle =
        api::telemetry::install_metrics().expect("failed to install Prometheus recorder");

    // 3. Connect to the database
    let pool = api::server::connect_pool(&config.database)
        .await
        .expect("failed to connect to database");
    let store = PostgresStore::new(pool.clone());
    if config.run_migrations {
        store
            .run_migrations()
            .await
            .expect("failed to run migrations");
    }

    // 4. Build the application
    let state = Arc::new(AppState::new(OrderService::new(store)));
    let app = api::orders_app(state, metrics_handle);

    // 5. Serve until shutdown
    api::server::serve(app, &config.addr())
        .await
        .expect("server error");

    pool.close().await;
    tracing::info!("orders service shut down gracefully");
}
