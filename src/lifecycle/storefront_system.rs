use crate::clients::{CustomerClient, OrderClient};
use crate::config::{AppConfig, ConfigError};
use crate::customer::CustomerError;
use crate::model::{Customer, Order};
use crate::order::OrderError;
use crate::routes::AppRoute;
use crate::views::{
    CustomerDetail, CustomerEditForm, CustomerList, OrderDetail, OrderEditForm, OrderList,
};
use rest_framework::view::{resolve, EntityRoute, Resolved};
use rest_framework::{
    fetch_entry, EventBus, FrameworkError, HttpResponse, ReqwestTransport, Transport,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot set up transport: {0}")]
    Transport(FrameworkError),

    #[error("Cannot reach API entry: {0}")]
    Entry(FrameworkError),

    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Gateway task failed: {0}")]
    TaskFailed(String),
}

/// A screen ready to render, as reached through an [`AppRoute`].
pub enum Screen {
    Customers(CustomerList),
    CustomerDetail(CustomerDetail),
    CustomerForm(CustomerEditForm),
    Orders(OrderList),
    OrderDetail(OrderDetail),
    OrderForm(OrderEditForm),
}

/// The runtime of the admin client.
///
/// # Example
///
/// ```ignore
/// let system = StorefrontSystem::new(&AppConfig::default())?;
///
/// let mut customers = system.customer_list();
/// customers.init().await?;
/// let dialog = customers.delete(customer);
/// // confirming the dialog reloads `customers` through the bus
///
/// drop(customers);
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    pub customer_client: CustomerClient,
    pub order_client: OrderClient,
    transport: Arc<dyn Transport>,
    bus: EventBus,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Connects to `config.server_api_url` and starts the gateways.
    pub fn new(config: &AppConfig) -> Result<Self, SystemError> {
        let transport = ReqwestTransport::new(&config.server_api_url, config.request_timeout())
            .map_err(SystemError::Transport)?;
        info!(api = %transport.base_url(), "Using backend");
        Ok(Self::with_transport(Arc::new(transport), config.channel_buffer))
    }

    /// Starts the gateways over an already built transport.
    pub fn with_transport(transport: Arc<dyn Transport>, channel_buffer: usize) -> Self {
        let (customer_gateway, customer_client) = crate::customer::new(channel_buffer);
        let (order_gateway, order_client) = crate::order::new(channel_buffer);

        let customer_handle = tokio::spawn(customer_gateway.run(transport.clone()));
        let order_handle = tokio::spawn(order_gateway.run(transport.clone()));

        Self {
            customer_client,
            order_client,
            transport,
            bus: EventBus::new(),
            handles: vec![customer_handle, order_handle],
        }
    }

    /// Asks the backend which resources it serves. The answer is in `controls`.
    pub async fn entry(&self) -> Result<HttpResponse<()>, SystemError> {
        let entry = fetch_entry(self.transport.as_ref())
            .await
            .map_err(SystemError::Entry)?;
        info!(has_controls = entry.controls.is_some(), "API entry fetched");
        Ok(entry)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn customer_list(&self) -> CustomerList {
        CustomerList::new(self.customer_client.clone(), self.bus.clone())
    }

    pub fn order_list(&self) -> OrderList {
        OrderList::new(self.order_client.clone(), self.bus.clone())
    }

    pub fn customer_form(&self, customer: Customer) -> CustomerEditForm {
        CustomerEditForm::new(self.customer_client.clone(), customer)
    }

    pub fn order_form(&self, order: Order) -> OrderEditForm {
        OrderEditForm::new(self.order_client.clone(), self.customer_client.clone(), order)
    }

    /// Builds the screen behind `route`, fetching its entity when it shows one.
    ///
    /// List screens come back un-initialized; call `init()` on them to load and listen.
    /// The order form comes back with its customer options loaded.
    pub async fn open(&self, route: AppRoute) -> Result<Screen, SystemError> {
        info!(%route, "Opening");
        let screen = match route {
            AppRoute::Customer(route) => {
                match resolve::<Customer, _>(route, &self.customer_client).await? {
                    Resolved::List => Screen::Customers(self.customer_list()),
                    Resolved::Entity(customer) => match route {
                        EntityRoute::View(_) => {
                            Screen::CustomerDetail(CustomerDetail::from_entity(customer))
                        }
                        _ => Screen::CustomerForm(self.customer_form(customer)),
                    },
                }
            }
            AppRoute::Order(route) => match resolve::<Order, _>(route, &self.order_client).await? {
                Resolved::List => Screen::Orders(self.order_list()),
                Resolved::Entity(order) => match route {
                    EntityRoute::View(_) => Screen::OrderDetail(OrderDetail::from_entity(order)),
                    _ => {
                        let mut form = self.order_form(order);
                        form.load_customer_options().await?;
                        Screen::OrderForm(form)
                    }
                },
            },
        };
        Ok(screen)
    }

    /// Gracefully shuts down the gateways.
    ///
    /// Waits until every client clone handed out (including those inside views) is
    /// dropped and the in-flight requests are answered.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.customer_client);
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Gateway task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
