//! # Storefront Admin
//!
//! Demo of the admin client against a running backend:
//! 1.  Loads [`AppConfig`] (file, environment, then flags).
//! 2.  Starts the [`StorefrontSystem`].
//! 3.  Lists customers, creates one with an order, and lists its orders.
//!
//! ```text
//! RUST_LOG=info storefront-admin --api-url http://localhost:8080/
//! ```

use clap::Parser;
use rest_framework::telemetry::setup_tracing;
use rest_framework::{EntityClient, RequestOptions};
use std::path::PathBuf;
use storefront_admin::config::AppConfig;
use storefront_admin::lifecycle::StorefrontSystem;
use storefront_admin::model::{Customer, Order};
use tracing::{error, info, Instrument};

#[derive(Debug, Parser)]
#[command(name = "storefront-admin", about = "Customer and order administration client")]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the file and STOREFRONT_API_URL.
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    setup_tracing();

    let mut config = AppConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url).map_err(|e| e.to_string())?;
    }

    let system = StorefrontSystem::new(&config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("customer_list");
    async {
        let mut customers = system.customer_list().with_options(RequestOptions::new().size(20));
        match customers.init().await {
            Ok(()) => {
                let state = customers.state();
                for customer in state.entities.unwrap_or_default() {
                    info!(%customer, orders = customer.orders().len(), "Customer");
                }
                info!(total = ?state.total_count, "Customers listed");
            }
            Err(e) => error!(error = %e, "Could not list customers"),
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("customer_creation");
    let outcome = async {
        let mut form = system.customer_form(Customer::new("Demo Customer"));
        let customer = form.save().await.map_err(|e| e.to_string())?;
        info!(%customer, "Customer created");

        let order = Order::new("Demo Product", 19.99).for_customer(&customer);
        let order = system
            .order_client
            .create(order)
            .await
            .map_err(|e| e.to_string())?
            .body
            .ok_or("order response had no body")?;
        info!(%order, "Order created");

        let orders = system
            .order_client
            .orders_of(&customer, RequestOptions::new())
            .await
            .map_err(|e| e.to_string())?;
        info!(count = orders.body.map_or(0, |o| o.len()), "Orders of new customer");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = outcome {
        error!(error = %e, "Demo flow failed");
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Application completed successfully");
    Ok(())
}
