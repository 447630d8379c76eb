//! Error types for order operations.

use rest_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("A new order cannot already have an ID: {0}")]
    IdExists(String),

    #[error("Order has no ID")]
    MissingId,

    /// Orders can only be listed per customer once that customer is saved.
    #[error("Customer has no ID")]
    UnsavedCustomer,

    #[error("Order request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Order service communication error: {0}")]
    Communication(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(path) => OrderError::NotFound(path),
            FrameworkError::IdAlreadyAssigned(id) => OrderError::IdExists(id),
            FrameworkError::MissingId => OrderError::MissingId,
            FrameworkError::Status { status, message } => OrderError::Rejected { status, message },
            other => OrderError::Communication(other.to_string()),
        }
    }
}
