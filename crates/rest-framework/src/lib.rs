//! # REST Framework
//!
//! Building blocks for typed REST clients of a CRUD backend: one generic gateway per
//! resource, a channel-based client in front of it, and headless views (list, delete
//! dialog, detail, edit form, routes) that talk to any resource through the same trait.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`RestEntity`]) - the record, its collection path and its
//!    list-modified topic.
//! 2. **Runtime Layer** ([`ResourceGateway`]) - receives requests and performs them over a
//!    [`Transport`], one task per request.
//! 3. **Interface Layer** ([`ResourceClient`], [`EntityClient`]) - the typed async API.
//! 4. **View Layer** ([`view`]) - screen models driven by a client and the [`EventBus`].
//!
//! ```text
//!  ListView ──query──▶ CustomerClient ──mpsc──▶ ResourceGateway<Customer> ──HTTP──▶ backend
//!     ▲                                                                            │
//!     └─ reload ◀── EventBus("customerListModification") ◀── DeleteDialog ◀────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rest_framework::{ResourceGateway, ReqwestTransport, RequestOptions};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(ReqwestTransport::new("http://localhost:8080/", None)?);
//! let (gateway, client) = ResourceGateway::<Customer>::new(32);
//! tokio::spawn(gateway.run(transport));
//!
//! let page = client.query(RequestOptions::new().page(0).size(20)).await?;
//! println!("{} of {:?}", page.body.unwrap_or_default().len(), page.total_count());
//! ```
//!
//! ## Errors
//!
//! Nothing fails silently. Every operation returns a `Result`; resource clients convert
//! [`FrameworkError`] into their own error type through [`EntityClient::map_error`].
//!
//! ## Testing
//!
//! See [`mock`] for the test doubles: channel helpers, the fluent [`mock::MockClient`] and
//! the in-memory [`mock::MockTransport`].

pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod events;
pub mod gateway;
pub mod message;
pub mod mock;
pub mod options;
pub mod response;
pub mod telemetry;
pub mod transport;
pub mod view;

// Re-export core types for convenience
pub use client::ResourceClient;
pub use client_trait::EntityClient;
pub use entity::RestEntity;
pub use error::FrameworkError;
pub use events::{Event, EventBus, Subscription, SubscriptionHandle, SubscriptionId};
pub use gateway::ResourceGateway;
pub use message::{ResourceRequest, Response};
pub use options::RequestOptions;
pub use response::{parse_links, HttpResponse, PageControls, RawResponse};
pub use transport::{fetch_entry, HttpRequest, ReqwestTransport, Transport, ENTRY_PATH};

// HTTP verbs appear in HttpRequest and MockTransport routes.
pub use reqwest::Method;
