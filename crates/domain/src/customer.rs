//! Customer registration.

use common::CustomerId;
use store::{Customer, CustomerStore, NewCustomer};
use thiserror::Error;

use crate::error::DomainError;

/// Errors that can occur when registering a customer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerError {
    /// A required field was absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Command to register a new customer.
#[derive(Clone, Default)]
pub struct RegisterCustomer {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub identity_number: Option<String>,
}

// Keeps the identity number out of logs and panics.
impl std::fmt::Debug for RegisterCustomer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCustomer")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("identity_number", &self.identity_number.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RegisterCustomer {
    /// Checks that every field is present and not blank.
    pub fn validate(self) -> Result<NewCustomer, CustomerError> {
        Ok(NewCustomer {
            full_name: required(self.full_name, "full_name")?,
            email: required(self.email, "email")?,
            identity_number: required(self.identity_number, "identity_number")?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, CustomerError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(CustomerError::MissingField(field))
}

/// Service for registering and listing customers.
pub struct CustomerService<S: CustomerStore> {
    store: S,
}

impl<S: CustomerStore> CustomerService<S> {
    /// Creates a new customer service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and persists a new customer.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn register(&self, cmd: RegisterCustomer) -> Result<CustomerId, DomainError> {
        let customer = cmd.validate()?;
        let id = self.store.create_customer(customer).await?;

        metrics::counter!("customers_created_total").increment(1);
        tracing::info!(customer_id = %id, "customer registered");
        Ok(id)
    }

    /// Lists every customer.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>, DomainError> {
        Ok(self.store.list_customers().await?)
    }
}
