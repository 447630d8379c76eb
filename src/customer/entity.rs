//! [`RestEntity`] implementation for [`Customer`].

use crate::model::{Customer, CustomerId};
use rest_framework::RestEntity;

impl RestEntity for Customer {
    type Id = CustomerId;
    const RESOURCE_PATH: &'static str = "api/customers";
    const LIST_MODIFIED_EVENT: &'static str = "customerListModification";

    fn id(&self) -> Option<CustomerId> {
        self.id
    }
}
