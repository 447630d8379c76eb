//! # RestEntity Trait
//!
//! The `RestEntity` trait defines the contract every backend record (Customer, Order, …)
//! implements to be served by the generic [`ResourceGateway`](crate::ResourceGateway)
//! and shown by the generic views. It names the REST collection the record lives under,
//! the bus topic announcing changes to that collection, and how to read its identifier.
//!
//! # Architecture Note
//! The gateway, the client and every view are written *once* against this trait.
//! A `Customer` view can only ever talk to the `api/customers` resource: the path is
//! an associated constant, not a runtime string handed around by callers.
//!
//! # Identifier Invariant
//! [`RestEntity::id`] returns `None` only for a record that was never persisted. Once the
//! backend assigns an identifier it does not change for the lifetime of that record.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any backend record must implement to be managed by the framework.
pub trait RestEntity:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Server-assigned identifier (e.g., a numeric newtype).
    type Id: Copy + Eq + Hash + Send + Sync + Display + Debug + 'static;

    /// Collection path relative to the API base, e.g. `"api/customers"`.
    const RESOURCE_PATH: &'static str;

    /// Bus topic published after the collection changed, e.g. `"customerListModification"`.
    const LIST_MODIFIED_EVENT: &'static str;

    /// The identifier, or `None` before the record is persisted.
    fn id(&self) -> Option<Self::Id>;

    /// Path of a single record: `{RESOURCE_PATH}/{id}`.
    fn item_path(id: Self::Id) -> String {
        format!("{}/{}", Self::RESOURCE_PATH, id)
    }
}
