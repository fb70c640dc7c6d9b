//! Order creation and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, ProductId};
use domain::{CreateOrder, OrderLine, OrderService};
use serde::{Deserialize, Serialize};
use store::{OrderRecord, OrderStore};

use crate::error::ApiError;

/// Shared state of the orders service.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S>,
}

impl<S: OrderStore> AppState<S> {
    /// Wraps an order service for use as router state.
    pub fn new(order_service: OrderService<S>) -> Self {
        Self { order_service }
    }
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Option<i32>,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i32,
    pub quantity: i64,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(req: CreateOrderRequest) -> Self {
        CreateOrder {
            customer_id: req.customer_id.map(CustomerId::new),
            items: req
                .items
                .into_iter()
                .map(|item| OrderLine::new(item.product_id, item.quantity))
                .collect(),
        }
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub message: &'static str,
    pub order_id: OrderId,
    pub total: Money,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub total: Money,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub quantity: u32,
    pub subtotal: Money,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            order_date: order.order_date,
            total: order.total,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    subtotal: item.subtotal,
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /api/orders: create an order and its items in one transaction.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let Json(req) = payload?;

    let created = state.order_service.create_order(req.into()).await?;

    let response = OrderCreatedResponse {
        message: "Order created",
        order_id: created.order_id,
        total: created.total,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/orders: list every order with its items, by id ascending.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.order_service.list_orders().await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
