//! HTTP services for the storefront.
//!
//! Three independent routers (orders, catalog, customers), each served by its
//! own binary, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{CustomerStore, OrderStore, ProductCatalog};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::catalog::CatalogState;
use routes::customers::CustomersState;
use routes::orders::AppState;

/// Creates the orders service router.
pub fn orders_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let router = Router::new()
        .route("/api/orders/healthz", get(routes::health::check))
        .route(
            "/api/orders",
            get(routes::orders::list::<S>).post(routes::orders::create::<S>),
        )
        .with_state(state);

    with_common_layers(router, metrics_handle)
}

/// Creates the catalog service router.
pub fn catalog_app<C: ProductCatalog + 'static>(
    state: Arc<CatalogState<C>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let router = Router::new()
        .route("/api/catalog/healthz", get(routes::health::check))
        .route(
            "/api/catalog/products",
            get(routes::catalog::list_products::<C>),
        )
        .with_state(state);

    with_common_layers(router, metrics_handle)
}

/// Creates the customers service router.
pub fn customers_app<S: CustomerStore + 'static>(
    state: Arc<CustomersState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let router = Router::new()
        .route("/api/customers/healthz", get(routes::health::check))
        .route(
            "/api/customers",
            get(routes::customers::list::<S>).post(routes::customers::create::<S>),
        )
        .with_state(state);

    with_common_layers(router, metrics_handle)
}

fn with_common_layers(router: Router, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    router
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
