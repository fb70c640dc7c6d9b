//! Catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::{Money, ProductId};
use serde::Serialize;
use store::{Product, ProductCatalog};

use crate::error::ApiError;

/// Shared state of the catalog service.
pub struct CatalogState<C: ProductCatalog> {
    pub catalog: C,
}

impl<C: ProductCatalog> CatalogState<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
        }
    }
}

/// GET /api/catalog/products: list all products ordered by id.
#[tracing::instrument(skip(state))]
pub async fn list_products<C: ProductCatalog + 'static>(
    State(state): State<Arc<CatalogState<C>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.catalog.list_products().await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}
