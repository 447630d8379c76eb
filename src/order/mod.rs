//! Order-specific resource wiring and entity implementation.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use rest_framework::ResourceGateway;

/// Creates a new Order gateway and its client.
pub fn new(buffer_size: usize) -> (ResourceGateway<Order>, OrderClient) {
    let (gateway, generic_client) = ResourceGateway::new(buffer_size);
    (gateway, OrderClient::new(generic_client))
}
