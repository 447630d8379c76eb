//! # EntityClient Trait
//!
//! Provides a common interface for resource‑specific clients, adding default `query`,
//! `find`, `create`, `update` and `delete` methods built on top of a generic
//! `ResourceClient`.
use crate::{FrameworkError, HttpResponse, RequestOptions, ResourceClient, RestEntity};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard REST operations.
///
/// A resource client only has to expose its inner [`ResourceClient`] and say how a
/// [`FrameworkError`] becomes its own error type; every operation below comes for free.
/// Views ([`ListView`](crate::view::ListView), [`DeleteDialog`](crate::view::DeleteDialog),
/// …) are generic over this trait, so they work unchanged for every resource.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct CustomerClient { inner: ResourceClient<Customer> }
///
/// #[async_trait]
/// impl EntityClient<Customer> for CustomerClient {
///     type Error = CustomerError;
///     fn inner(&self) -> &ResourceClient<Customer> { &self.inner }
///     fn map_error(e: FrameworkError) -> Self::Error { CustomerError::from(e) }
/// }
///
/// // query(), find(), create(), update() and delete() are provided automatically.
/// let all = client.query(RequestOptions::new()).await?;
/// ```
#[async_trait]
pub trait EntityClient<T: RestEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// List the collection.
    #[tracing::instrument(skip(self), fields(resource = T::RESOURCE_PATH))]
    async fn query(&self, options: RequestOptions) -> Result<HttpResponse<Vec<T>>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(options).await.map_err(Self::map_error)
    }

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self), fields(resource = T::RESOURCE_PATH))]
    async fn find(&self, id: T::Id) -> Result<HttpResponse<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().find(id).await.map_err(Self::map_error)
    }

    /// Persist a new entity; the response carries the server copy with its ID.
    #[tracing::instrument(skip(self, entity), fields(resource = T::RESOURCE_PATH))]
    async fn create(&self, entity: T) -> Result<HttpResponse<T>, Self::Error> {
        tracing::debug!(?entity, "Sending request");
        self.inner().create(entity).await.map_err(Self::map_error)
    }

    /// Replace an existing entity with the full payload.
    #[tracing::instrument(skip(self, entity), fields(resource = T::RESOURCE_PATH))]
    async fn update(&self, entity: T) -> Result<HttpResponse<T>, Self::Error> {
        tracing::debug!(?entity, "Sending request");
        self.inner().update(entity).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self), fields(resource = T::RESOURCE_PATH))]
    async fn delete(&self, id: T::Id) -> Result<HttpResponse<()>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
