//! # Generic Client
//!
//! This module defines the generic client for communicating with gateways.

use crate::entity::RestEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::options::RequestOptions;
use crate::response::HttpResponse;
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type‑safe, async API for a `ResourceGateway<T>`.
/// It forwards each REST call as a [`ResourceRequest`] over a Tokio mpsc channel and
/// returns the result via a oneshot channel.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – every method resolves to `Result<HttpResponse<…>, FrameworkError>`.
/// * **Checked** – identifier invariants are enforced before anything is sent.
pub struct ResourceClient<T: RestEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: RestEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: RestEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    /// `GET {resource}` with `options` as query string.
    pub async fn query(
        &self,
        options: RequestOptions,
    ) -> Result<HttpResponse<Vec<T>>, FrameworkError> {
        self.query_at(T::RESOURCE_PATH, options).await
    }

    /// `GET` on another collection returning `T`, e.g. `api/customers/3/orders`.
    pub async fn query_at(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
    ) -> Result<HttpResponse<Vec<T>>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Query {
                path: path.into(),
                options,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::GatewayClosed)?;
        response.await.map_err(|_| FrameworkError::GatewayDropped)?
    }

    pub async fn find(&self, id: T::Id) -> Result<HttpResponse<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Find { id, respond_to })
            .await
            .map_err(|_| FrameworkError::GatewayClosed)?;
        response.await.map_err(|_| FrameworkError::GatewayDropped)?
    }

    /// Fails with [`FrameworkError::IdAlreadyAssigned`] if `entity` was already persisted.
    pub async fn create(&self, entity: T) -> Result<HttpResponse<T>, FrameworkError> {
        if let Some(id) = entity.id() {
            return Err(FrameworkError::IdAlreadyAssigned(id.to_string()));
        }
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { entity, respond_to })
            .await
            .map_err(|_| FrameworkError::GatewayClosed)?;
        response.await.map_err(|_| FrameworkError::GatewayDropped)?
    }

    /// Fails with [`FrameworkError::MissingId`] if `entity` was never persisted.
    pub async fn update(&self, entity: T) -> Result<HttpResponse<T>, FrameworkError> {
        let id = entity.id().ok_or(FrameworkError::MissingId)?;
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Update {
                id,
                entity,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::GatewayClosed)?;
        response.await.map_err(|_| FrameworkError::GatewayDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<HttpResponse<()>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Delete { id, respond_to })
            .await
            .map_err(|_| FrameworkError::GatewayClosed)?;
        response.await.map_err(|_| FrameworkError::GatewayDropped)?
    }
}
