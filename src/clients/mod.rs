//! Type-safe wrappers around [`ResourceClient`](rest_framework::ResourceClient).

pub mod customer_client;
pub mod order_client;

pub use customer_client::*;
pub use order_client::*;
