//! Route table of the admin screens.

use crate::model::{CustomerId, OrderId};
use rest_framework::view::EntityRoute;
use std::fmt::Display;

pub const CUSTOMER_BASE: &str = "customer";
pub const ORDER_BASE: &str = "order";

/// Every screen of the application, addressed by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Customer(EntityRoute<CustomerId>),
    Order(EntityRoute<OrderId>),
}

impl AppRoute {
    pub fn parse(path: &str) -> Option<Self> {
        EntityRoute::parse(CUSTOMER_BASE, path)
            .map(AppRoute::Customer)
            .or_else(|| EntityRoute::parse(ORDER_BASE, path).map(AppRoute::Order))
    }

    pub fn path(&self) -> String {
        match self {
            AppRoute::Customer(route) => route.path(CUSTOMER_BASE),
            AppRoute::Order(route) => route.path(ORDER_BASE),
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.path())
    }
}
