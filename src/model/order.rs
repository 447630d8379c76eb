use crate::model::{Customer, CustomerId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

/// Type-safe identifier for Orders, serialized as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// An order placed by a customer.
///
/// `customer` is a copy of the owner for display and editing, not an ownership edge:
/// the backend does not embed that customer's own orders in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<Customer>>,
}

impl Order {
    /// An order that has not been persisted yet.
    pub fn new(product: impl Into<String>, cost: f64) -> Self {
        Self {
            product: Some(product.into()),
            cost: Some(cost),
            ..Self::default()
        }
    }

    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(OrderId(id)),
            ..Self::default()
        }
    }

    /// Assigns the owner. Its nested orders are dropped; only the reference is kept.
    pub fn for_customer(mut self, customer: &Customer) -> Self {
        self.customer = Some(Box::new(Customer {
            orders: None,
            ..customer.clone()
        }));
        self
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer.as_ref().and_then(|c| c.id)
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Order{{id={id}")?,
            None => write!(f, "Order{{id=null")?,
        }
        write!(f, ", product='{}'", self.product.as_deref().unwrap_or_default())?;
        match self.cost {
            Some(cost) => write!(f, ", cost={cost}}}"),
            None => write!(f, ", cost=null}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn owner_is_a_reference_without_its_orders() {
        let mut owner = Customer::with_id(2).name("Ada");
        owner.orders = Some(vec![Order::with_id(1)]);

        let order = Order::new("Desk", 250.0).for_customer(&owner);
        assert_eq!(order.customer_id(), Some(CustomerId(2)));
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({"product": "Desk", "cost": 250.0, "customer": {"id": 2, "name": "Ada"}})
        );
    }

    #[test]
    fn displays_like_the_backend_logs() {
        let mut order = Order::new("Desk", 250.5);
        order.id = Some(OrderId(8));
        assert_eq!(order.to_string(), "Order{id=8, product='Desk', cost=250.5}");
    }

    #[test]
    fn ids_parse_from_route_segments() {
        assert_eq!("17".parse::<OrderId>(), Ok(OrderId(17)));
        assert!("x".parse::<OrderId>().is_err());
    }
}
