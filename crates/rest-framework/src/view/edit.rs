//! Create/update form bound to one entity.

use crate::client_trait::EntityClient;
use crate::entity::RestEntity;
use crate::error::FrameworkError;
use tracing::{debug, instrument};

/// Two-way bound form over an entity.
///
/// The form does no validation of its own: [`EditForm::save`] submits the entity as it
/// stands, to `create` when it has no identifier and to `update` otherwise.
pub struct EditForm<T: RestEntity, C: EntityClient<T>> {
    client: C,
    entity: T,
    saving: bool,
}

impl<T: RestEntity, C: EntityClient<T>> EditForm<T, C> {
    pub fn new(client: C, entity: T) -> Self {
        Self {
            client,
            entity,
            saving: false,
        }
    }

    /// A form for a brand new entity.
    pub fn blank(client: C) -> Self
    where
        T: Default,
    {
        Self::new(client, T::default())
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut T {
        &mut self.entity
    }

    pub fn is_new(&self) -> bool {
        self.entity.id().is_none()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Submits the entity. On success the form holds the server's copy.
    #[instrument(skip(self), fields(resource = T::RESOURCE_PATH, new = self.is_new()))]
    pub async fn save(&mut self) -> Result<T, C::Error> {
        let entity = self.entity.clone();
        let is_new = self.is_new();
        let result = {
            let _saving = Saving::start(&mut self.saving);
            if is_new {
                self.client.create(entity).await
            } else {
                self.client.update(entity).await
            }
        };

        let saved = result?
            .body
            .ok_or_else(|| C::map_error(FrameworkError::Decode("empty body on save".into())))?;
        debug!(id = ?saved.id(), "Saved");
        self.entity = saved.clone();
        Ok(saved)
    }
}

/// Holds `saving` up until the submission ends, however it ends.
struct Saving<'a>(&'a mut bool);

impl<'a> Saving<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Saving<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{create_mock_client, expect_create, expect_update};
    use crate::view::tests_support::{Note, NoteClient};
    use crate::HttpResponse;

    #[tokio::test]
    async fn new_entity_is_created() {
        let (client, mut rx) = create_mock_client::<Note>(10);
        let mut form = EditForm::new(NoteClient::new(client), Note::draft("hello"));
        assert!(form.is_new());

        let (result, ()) = tokio::join!(form.save(), async {
            let (entity, responder) = expect_create(&mut rx).await.expect("Expected Create request");
            assert_eq!(entity, Note::draft("hello"));
            let mut saved = entity.clone();
            saved.id = Some(11);
            responder.send(Ok(HttpResponse::ok(saved))).unwrap();
        });

        assert_eq!(result.unwrap().id, Some(11));
        assert!(!form.is_new());
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn existing_entity_is_updated() {
        let (client, mut rx) = create_mock_client::<Note>(10);
        let mut form = EditForm::new(NoteClient::new(client), Note::stored(4));
        form.entity_mut().text = "edited".into();

        let (result, ()) = tokio::join!(form.save(), async {
            let (id, entity, responder) = expect_update(&mut rx).await.expect("Expected Update request");
            assert_eq!(id, 4);
            assert_eq!(entity.text, "edited");
            responder.send(Ok(HttpResponse::ok(entity))).unwrap();
        });

        assert_eq!(result.unwrap().text, "edited");
    }

    #[tokio::test]
    async fn failed_save_keeps_edits() {
        let (client, mut rx) = create_mock_client::<Note>(10);
        let mut form = EditForm::new(NoteClient::new(client), Note::stored(4));
        form.entity_mut().text = "unsaved".into();

        let (result, ()) = tokio::join!(form.save(), async {
            let (_, _, responder) = expect_update(&mut rx).await.unwrap();
            responder
                .send(Err(FrameworkError::Transport("offline".into())))
                .unwrap();
        });

        assert!(result.is_err());
        assert_eq!(form.entity().text, "unsaved");
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn abandoned_save_clears_saving() {
        let (client, mut rx) = create_mock_client::<Note>(10);
        let mut form = EditForm::new(NoteClient::new(client), Note::draft("pending"));

        let outcome =
            tokio::time::timeout(std::time::Duration::from_millis(20), form.save()).await;
        assert!(outcome.is_err());
        // The create went out but was never answered.
        let (_, _responder) = expect_create(&mut rx).await.unwrap();

        assert!(!form.is_saving());
        assert!(form.is_new());
    }
}
