//! # Order Client
//!
//! Provides a high‑level API for the `api/orders` resource, plus the per-customer
//! listing the backend serves under `api/customers/{id}/orders`.
use crate::model::{Customer, CustomerId, Order};
use crate::order::OrderError;
use async_trait::async_trait;
use rest_framework::{
    EntityClient, FrameworkError, HttpResponse, RequestOptions, ResourceClient, RestEntity,
};
use tracing::{debug, instrument};

/// Client for the `api/orders` resource.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Lists the orders of one customer, paged like any other query.
    #[instrument(skip(self))]
    pub async fn query_by_customer(
        &self,
        customer_id: CustomerId,
        options: RequestOptions,
    ) -> Result<HttpResponse<Vec<Order>>, OrderError> {
        let path = format!("{}/orders", Customer::item_path(customer_id));
        debug!(%path, "Sending request");
        self.inner
            .query_at(path, options)
            .await
            .map_err(OrderError::from)
    }

    /// Same as [`OrderClient::query_by_customer`] for a loaded customer record.
    pub async fn orders_of(
        &self,
        customer: &Customer,
        options: RequestOptions,
    ) -> Result<HttpResponse<Vec<Order>>, OrderError> {
        let id = customer.id.ok_or(OrderError::UnsavedCustomer)?;
        self.query_by_customer(id, options).await
    }
}

#[async_trait]
impl EntityClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::from(e)
    }
}
