//! # Storefront Admin Library
//!
//! Customer and order administration over the backend's REST API, built on
//! [`rest_framework`]. This library exposes the modules of the application for the demo
//! binary and for integration testing.
//!
//! - **[model]**: the records ([`Customer`](model::Customer), [`Order`](model::Order)).
//! - **[customer]**, **[order]**: their `RestEntity` impls, errors and gateway factories.
//! - **[clients]**: typed clients, e.g. [`OrderClient::query_by_customer`](clients::OrderClient::query_by_customer).
//! - **[views]**, **[routes]**: screen models and the route table.
//! - **[lifecycle]**: [`StorefrontSystem`](lifecycle::StorefrontSystem), the composition root.
//! - **[config]**: [`AppConfig`](config::AppConfig).

pub mod clients;
pub mod config;
pub mod customer;
pub mod lifecycle;
pub mod model;
pub mod order;
pub mod routes;
pub mod views;
