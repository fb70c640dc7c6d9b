//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use common::CustomerId;
use domain::{CustomerService, RegisterCustomer};
use serde::{Deserialize, Serialize};
use store::{Customer, CustomerStore};

use crate::error::ApiError;

/// Shared state of the customers service.
pub struct CustomersState<S: CustomerStore> {
    pub customer_service: CustomerService<S>,
}

impl<S: CustomerStore> CustomersState<S> {
    pub fn new(customer_service: CustomerService<S>) -> Self {
        Self { customer_service }
    }
}

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub identity_number: Option<String>,
}

impl From<CreateCustomerRequest> for RegisterCustomer {
    fn from(req: CreateCustomerRequest) -> Self {
        RegisterCustomer {
            full_name: req.full_name,
            email: req.email,
            identity_number: req.identity_number,
        }
    }
}

#[derive(Serialize)]
pub struct CustomerCreatedResponse {
    pub message: &'static str,
    pub customer_id: CustomerId,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub full_name: String,
    pub email: String,
    pub identity_number: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            id: customer.id,
            full_name: customer.full_name,
            email: customer.email,
            identity_number: customer.identity_number,
        }
    }
}

/// GET /api/customers: list customers with decrypted identity numbers.
#[tracing::instrument(skip(state))]
pub async fn list<S: CustomerStore + 'static>(
    State(state): State<Arc<CustomersState<S>>>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.customer_service.list().await?;

    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

/// POST /api/customers: register a customer.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: CustomerStore + 'static>(
    State(state): State<Arc<CustomersState<S>>>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerCreatedResponse>), ApiError> {
    let Json(req) = payload?;

    let customer_id = state.customer_service.register(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerCreatedResponse {
            message: "Customer created",
            customer_id,
        }),
    ))
}
