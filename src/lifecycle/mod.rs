//! # Lifecycle
//!
//! Composition root of the application: [`StorefrontSystem`] builds the transport,
//! starts one gateway per resource, owns the single [`EventBus`](rest_framework::EventBus)
//! and hands out clients and screen models wired to both.
//!
//! ## Shutdown
//!
//! Gateways stop once every client clone is gone. Drop the views (they hold clients)
//! before calling [`StorefrontSystem::shutdown`], which then waits for in-flight requests
//! to be answered.

pub mod storefront_system;

pub use storefront_system::*;
