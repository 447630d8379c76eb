//! Customer-specific resource wiring and entity implementation.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CustomerClient;
use crate::model::Customer;
use rest_framework::ResourceGateway;

/// Creates a new Customer gateway and its client.
pub fn new(buffer_size: usize) -> (ResourceGateway<Customer>, CustomerClient) {
    let (gateway, generic_client) = ResourceGateway::new(buffer_size);
    (gateway, CustomerClient::new(generic_client))
}
