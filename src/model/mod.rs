//! Records mirrored from the backend, serialized 1:1 as camelCase JSON.

pub mod customer;
pub mod order;

pub use customer::*;
pub use order::*;
