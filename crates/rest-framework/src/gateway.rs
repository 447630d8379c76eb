//! # Resource Gateway
//!
//! This module defines the `ResourceGateway`, the "server" half of a resource: it owns
//! the receiving end of the request channel and, once running, the [`Transport`].
//! Clients never touch the network themselves; they send a [`ResourceRequest`] and await
//! the answer.
//!
//! # Concurrency Model
//! The gateway does not serialize requests. Every message is dispatched in its own task,
//! so two overlapping loads of the same list are independent and whichever response
//! arrives last is the one a view ends up showing. Nothing is retried, cached or
//! de-duplicated.

use crate::client::ResourceClient;
use crate::entity::RestEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::response::RawResponse;
use crate::transport::{HttpRequest, Transport};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// The generic gateway serving one REST resource.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceGateway::new()` returns the gateway and its client.
/// 2.  **Wire**: pass the transport into `gateway.run(transport)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust,ignore
/// let (gateway, client) = ResourceGateway::<Customer>::new(32);
/// tokio::spawn(gateway.run(transport.clone()));
/// let customers = client.query(RequestOptions::new()).await?;
/// ```
///
/// The loop ends once every client clone has been dropped and all in-flight requests
/// have been answered.
pub struct ResourceGateway<T: RestEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
}

impl<T: RestEntity> ResourceGateway<T> {
    /// Creates a new `ResourceGateway` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full, client calls
    /// wait for room.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver }, ResourceClient::new(sender))
    }

    /// Runs the gateway's event loop until the channel closes.
    ///
    /// # Transport Injection
    /// The transport is handed over here rather than in `new()`, so clients can be created
    /// and passed around before the backend connection is configured.
    pub async fn run(mut self, transport: Arc<dyn Transport>) {
        // Extract just the type name (e.g., "Customer" instead of "storefront_admin::model::customer::Customer")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, resource = T::RESOURCE_PATH, "Gateway started");

        let mut in_flight = JoinSet::new();
        let mut served: u64 = 0;
        while let Some(msg) = self.receiver.recv().await {
            served += 1;
            in_flight.spawn(dispatch(transport.clone(), msg, entity_type));
            while in_flight.try_join_next().is_some() {}
        }
        while in_flight.join_next().await.is_some() {}

        info!(entity_type, served, "Shutdown");
    }
}

async fn dispatch<T: RestEntity>(
    transport: Arc<dyn Transport>,
    msg: ResourceRequest<T>,
    entity_type: &'static str,
) {
    match msg {
        ResourceRequest::Query {
            path,
            options,
            respond_to,
        } => {
            debug!(entity_type, %path, ?options, "Query");
            let request = HttpRequest::get(path.clone()).with_query(options.to_query_pairs());
            let result = execute(transport.as_ref(), request)
                .await
                .and_then(|raw| raw.decode::<Vec<T>>());
            match &result {
                Ok(res) => info!(
                    entity_type,
                    %path,
                    count = res.body.as_ref().map_or(0, Vec::len),
                    "Queried"
                ),
                Err(e) => warn!(entity_type, %path, error = %e, "Query failed"),
            }
            let _ = respond_to.send(result);
        }
        ResourceRequest::Find { id, respond_to } => {
            debug!(entity_type, %id, "Find");
            let result = execute(transport.as_ref(), HttpRequest::get(T::item_path(id)))
                .await
                .and_then(|raw| raw.decode::<T>());
            let found = result.as_ref().map_or(false, |res| res.body.is_some());
            match &result {
                Ok(_) => debug!(entity_type, %id, found, "Found"),
                Err(e) => warn!(entity_type, %id, error = %e, "Find failed"),
            }
            let _ = respond_to.send(result);
        }
        ResourceRequest::Create { entity, respond_to } => {
            debug!(entity_type, ?entity, "Create");
            let result = match encode(&entity) {
                Ok(body) => execute(transport.as_ref(), HttpRequest::post(T::RESOURCE_PATH, body))
                    .await
                    .and_then(|raw| raw.decode::<T>()),
                Err(e) => Err(e),
            };
            match &result {
                Ok(res) => {
                    let id = res.body.as_ref().and_then(|e| e.id());
                    info!(entity_type, id = ?id, "Created");
                }
                Err(e) => warn!(entity_type, error = %e, "Create failed"),
            }
            let _ = respond_to.send(result);
        }
        ResourceRequest::Update {
            id,
            entity,
            respond_to,
        } => {
            debug!(entity_type, %id, ?entity, "Update");
            let result = match encode(&entity) {
                Ok(body) => execute(transport.as_ref(), HttpRequest::put(T::item_path(id), body))
                    .await
                    .and_then(|raw| raw.decode::<T>()),
                Err(e) => Err(e),
            };
            match &result {
                Ok(_) => info!(entity_type, %id, "Updated"),
                Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
            }
            let _ = respond_to.send(result);
        }
        ResourceRequest::Delete { id, respond_to } => {
            debug!(entity_type, %id, "Delete");
            let result = execute(transport.as_ref(), HttpRequest::delete(T::item_path(id)))
                .await
                .map(|raw| raw.decode_empty());
            match &result {
                Ok(_) => info!(entity_type, %id, "Deleted"),
                Err(e) => warn!(entity_type, %id, error = %e, "Delete failed"),
            }
            let _ = respond_to.send(result);
        }
    }
}

async fn execute(
    transport: &dyn Transport,
    request: HttpRequest,
) -> Result<RawResponse, FrameworkError> {
    let path = request.path.clone();
    transport.send(request).await?.error_for_status(&path)
}

fn encode<T: RestEntity>(entity: &T) -> Result<serde_json::Value, FrameworkError> {
    serde_json::to_value(entity).map_err(|e| FrameworkError::Encode(e.to_string()))
}
