//! Delete confirmation dialog.

use crate::client_trait::EntityClient;
use crate::entity::RestEntity;
use crate::error::FrameworkError;
use crate::events::EventBus;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Open,
    /// Deleted and closed.
    Confirmed,
    /// Closed without deleting.
    Dismissed,
}

/// Modal asking to confirm the deletion of one entity.
///
/// The entity is a constructor argument: a dialog without a target cannot exist.
/// Confirming deletes it, publishes `T::LIST_MODIFIED_EVENT` and closes. A failed
/// delete leaves the dialog open and hands the error back.
pub struct DeleteDialog<T: RestEntity, C: EntityClient<T>> {
    client: C,
    bus: EventBus,
    entity: T,
    state: DialogState,
}

impl<T: RestEntity, C: EntityClient<T>> DeleteDialog<T, C> {
    pub fn open(client: C, bus: EventBus, entity: T) -> Self {
        Self {
            client,
            bus,
            entity,
            state: DialogState::Open,
        }
    }

    /// The entity this dialog deletes.
    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            self.state = DialogState::Dismissed;
        }
    }

    /// Deletes the entity, then announces the modification.
    ///
    /// Returns the number of listeners notified. Confirming a closed dialog is a no-op.
    #[instrument(skip(self), fields(resource = T::RESOURCE_PATH))]
    pub async fn confirm_delete(&mut self) -> Result<usize, C::Error> {
        if !self.is_open() {
            return Ok(0);
        }
        let id = self
            .entity
            .id()
            .ok_or_else(|| C::map_error(FrameworkError::MissingId))?;

        if let Err(e) = self.client.delete(id).await {
            warn!(%id, error = %e, "Delete not confirmed");
            return Err(e);
        }

        let notified = self.bus.publish(T::LIST_MODIFIED_EVENT);
        self.state = DialogState::Confirmed;
        info!(%id, notified, "Deleted, list modification published");
        Ok(notified)
    }
}
