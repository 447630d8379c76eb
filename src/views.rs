//! Screen models for customers and orders, built from the generic views.

use crate::clients::{CustomerClient, OrderClient};
use crate::customer::CustomerError;
use crate::model::{Customer, CustomerId, Order};
use crate::order::OrderError;
use rest_framework::view::{DeleteDialog, DetailView, EditForm, ListView};
use rest_framework::{EntityClient, RequestOptions};
use tracing::debug;

pub type CustomerList = ListView<Customer, CustomerClient>;
pub type CustomerDeleteDialog = DeleteDialog<Customer, CustomerClient>;
pub type CustomerDetail = DetailView<Customer>;
pub type CustomerEditForm = EditForm<Customer, CustomerClient>;

pub type OrderList = ListView<Order, OrderClient>;
pub type OrderDeleteDialog = DeleteDialog<Order, OrderClient>;
pub type OrderDetail = DetailView<Order>;

/// Order form with the customer picker it needs.
pub struct OrderEditForm {
    form: EditForm<Order, OrderClient>,
    customers: CustomerClient,
    customer_options: Vec<Customer>,
}

impl OrderEditForm {
    pub fn new(orders: OrderClient, customers: CustomerClient, order: Order) -> Self {
        Self {
            form: EditForm::new(orders, order),
            customers,
            customer_options: Vec::new(),
        }
    }

    pub fn blank(orders: OrderClient, customers: CustomerClient) -> Self {
        Self::new(orders, customers, Order::default())
    }

    /// Fetches every customer as a select option.
    pub async fn load_customer_options(&mut self) -> Result<&[Customer], CustomerError> {
        let res = self.customers.query(RequestOptions::new()).await?;
        self.customer_options = res.body.unwrap_or_default();
        debug!(count = self.customer_options.len(), "Customer options loaded");
        Ok(&self.customer_options)
    }

    pub fn customer_options(&self) -> &[Customer] {
        &self.customer_options
    }

    /// Sets the owner from the loaded options. Returns `false` for an unknown id.
    pub fn select_customer(&mut self, id: CustomerId) -> bool {
        let Some(customer) = self.customer_options.iter().find(|c| c.id == Some(id)) else {
            return false;
        };
        let order = std::mem::take(self.form.entity_mut());
        *self.form.entity_mut() = order.for_customer(customer);
        true
    }

    pub fn entity(&self) -> &Order {
        self.form.entity()
    }

    pub fn entity_mut(&mut self) -> &mut Order {
        self.form.entity_mut()
    }

    pub fn is_saving(&self) -> bool {
        self.form.is_saving()
    }

    pub async fn save(&mut self) -> Result<Order, OrderError> {
        self.form.save().await
    }
}
