//! # Framework Errors
//!
//! This module defines the common error types used throughout the framework.
//! Every remote call returns one of these explicitly, so callers always decide
//! what a failure means for them. Resource clients map them into their own
//! error enums (see [`EntityClient::map_error`](crate::EntityClient::map_error)).

/// Errors that can occur within the framework itself or on the wire.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Gateway closed")]
    GatewayClosed,
    #[error("Gateway dropped response channel")]
    GatewayDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Request rejected with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Could not decode response body: {0}")]
    Decode(String),
    #[error("Could not encode request body: {0}")]
    Encode(String),
    #[error("Entity has no identifier")]
    MissingId,
    #[error("A new entity cannot already have an ID: {0}")]
    IdAlreadyAssigned(String),
    #[error("Invalid Link header: {0}")]
    InvalidLink(String),
}

impl FrameworkError {
    /// Returns the HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FrameworkError::Status { status, .. } => Some(*status),
            FrameworkError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}
