use crate::customer::CustomerError;
use crate::model::Customer;
use async_trait::async_trait;
use rest_framework::{EntityClient, FrameworkError, ResourceClient};

/// Client for the `api/customers` resource.
///
/// All five operations come from [`EntityClient`]; failures surface as [`CustomerError`].
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<Customer>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EntityClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<Customer> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CustomerError::from(e)
    }
}
