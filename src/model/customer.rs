//! The customer record.
//!
//! # REST Framework
//! [`Customer`] implements [`RestEntity`](rest_framework::RestEntity) (see
//! [`crate::customer::entity`]), so it is served by a
//! [`ResourceGateway`](rest_framework::ResourceGateway) under `api/customers`.

use crate::model::Order;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

/// Type-safe identifier for Customers, serialized as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl From<i64> for CustomerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A customer and, when the backend includes them, its orders.
///
/// Every field is optional on the wire: a list response may carry nothing but ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
}

impl Customer {
    /// A customer that has not been persisted yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A reference to a stored customer carrying only its id.
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(CustomerId(id)),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The orders, or an empty slice when the backend left them out.
    pub fn orders(&self) -> &[Order] {
        self.orders.as_deref().unwrap_or_default()
    }
}

impl Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Customer{{id={id}")?,
            None => write!(f, "Customer{{id=null")?,
        }
        write!(f, ", name='{}'}}", self.name.as_deref().unwrap_or_default())
    }
}
