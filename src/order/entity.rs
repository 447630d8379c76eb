//! [`RestEntity`] implementation for [`Order`].

use crate::model::{Order, OrderId};
use rest_framework::RestEntity;

impl RestEntity for Order {
    type Id = OrderId;
    const RESOURCE_PATH: &'static str = "api/orders";
    const LIST_MODIFIED_EVENT: &'static str = "orderListModification";

    fn id(&self) -> Option<OrderId> {
        self.id
    }
}
