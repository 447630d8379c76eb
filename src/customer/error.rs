//! Error types for customer operations.

use rest_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    /// The requested customer was not found.
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// A create was attempted with a customer that already has an identifier.
    #[error("A new customer cannot already have an ID: {0}")]
    IdExists(String),

    /// An update or delete was attempted on a customer that was never saved.
    #[error("Customer has no ID")]
    MissingId,

    /// The backend answered with an error status.
    #[error("Customer request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("Customer service communication error: {0}")]
    Communication(String),
}

impl From<FrameworkError> for CustomerError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(path) => CustomerError::NotFound(path),
            FrameworkError::IdAlreadyAssigned(id) => CustomerError::IdExists(id),
            FrameworkError::MissingId => CustomerError::MissingId,
            FrameworkError::Status { status, message } => CustomerError::Rejected { status, message },
            other => CustomerError::Communication(other.to_string()),
        }
    }
}
