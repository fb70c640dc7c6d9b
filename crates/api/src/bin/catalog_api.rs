//! Catalog service entry point.

use std::sync::Arc;

use api::config::Config;
use api::routes::catalog::CatalogState;
use store::PostgresStore;

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    api::telemetry::init_tracing(&config);

    let metrics_handle =
        api::telemetry::install_metrics().expect("failed to install Prometheus recorder");

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

    let app = api::catalog_app(Arc::new(CatalogState::new(store)), metrics_handle);

    api::server::serve(app, &config.addr())
        .await
        .expect("server error");

    pool.close().await;
    tracing::info!("catalog service shut down gracefully");
}
