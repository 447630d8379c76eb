//! Read-only detail view of one entity.

use crate::client_trait::EntityClient;
use crate::entity::RestEntity;
use crate::error::FrameworkError;

/// Holds one entity fetched by id.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView<T: RestEntity> {
    entity: T,
}

impl<T: RestEntity> DetailView<T> {
    /// Fetches `id`. An empty body is reported as not found.
    pub async fn load<C: EntityClient<T>>(client: &C, id: T::Id) -> Result<Self, C::Error> {
        let res = client.find(id).await?;
        let entity = res
            .body
            .ok_or_else(|| C::map_error(FrameworkError::NotFound(T::item_path(id))))?;
        Ok(Self { entity })
    }

    /// Wraps an entity that was already resolved (e.g. by a route).
    pub fn from_entity(entity: T) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn into_entity(self) -> T {
        self.entity
    }
}
