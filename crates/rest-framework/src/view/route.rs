//! Per-entity navigation routes.
//!
//! Every resource exposes the same four screens under its base path:
//!
//! | Route | Path |
//! |-------|------|
//! | `List` | `{base}` |
//! | `View(id)` | `{base}/{id}/view` |
//! | `New` | `{base}/new` |
//! | `Edit(id)` | `{base}/{id}/edit` |
//!
//! [`resolve`] turns a route into the entity its screen starts from.

use crate::client_trait::EntityClient;
use crate::entity::RestEntity;
use crate::error::FrameworkError;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRoute<Id> {
    List,
    View(Id),
    New,
    Edit(Id),
}

impl<Id: Display> EntityRoute<Id> {
    /// The path of this route below `base` (e.g. `"customer"`).
    pub fn path(&self, base: &str) -> String {
        match self {
            EntityRoute::List => base.to_string(),
            EntityRoute::View(id) => format!("{base}/{id}/view"),
            EntityRoute::New => format!("{base}/new"),
            EntityRoute::Edit(id) => format!("{base}/{id}/edit"),
        }
    }
}

impl<Id: FromStr> EntityRoute<Id> {
    /// Parses `path` relative to `base`. Leading and trailing slashes are ignored.
    pub fn parse(base: &str, path: &str) -> Option<Self> {
        let base = base.trim_matches('/');
        let rest = path.trim_matches('/').strip_prefix(base)?;
        // A prefix match must end at a segment boundary: "customers" is not under "customer".
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(EntityRoute::List),
            ["new"] => Some(EntityRoute::New),
            [id, "view"] => id.parse().ok().map(EntityRoute::View),
            [id, "edit"] => id.parse().ok().map(EntityRoute::Edit),
            _ => None,
        }
    }
}

/// The entity a route's screen starts from.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    /// The list screen resolves nothing; it loads itself.
    List,
    Entity(T),
}

/// Fetches what `route` needs: the stored entity for `View`/`Edit`, a blank one for `New`.
pub async fn resolve<T, C>(route: EntityRoute<T::Id>, client: &C) -> Result<Resolved<T>, C::Error>
where
    T: RestEntity + Default,
    C: EntityClient<T>,
{
    match route {
        EntityRoute::List => Ok(Resolved::List),
        EntityRoute::New => Ok(Resolved::Entity(T::default())),
        EntityRoute::View(id) | EntityRoute::Edit(id) => client
            .find(id)
            .await?
            .body
            .map(Resolved::Entity)
            .ok_or_else(|| C::map_error(FrameworkError::NotFound(T::item_path(id)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use crate::view::tests_support::{Note, NoteClient};
    use crate::HttpResponse;

    #[test]
    fn paths() {
        assert_eq!(EntityRoute::<u32>::List.path("note"), "note");
        assert_eq!(EntityRoute::View(4u32).path("note"), "note/4/view");
        assert_eq!(EntityRoute::<u32>::New.path("note"), "note/new");
        assert_eq!(EntityRoute::Edit(4u32).path("note"), "note/4/edit");
    }

    #[test]
    fn parses_what_it_prints() {
        for route in [
            EntityRoute::List,
            EntityRoute::View(9u32),
            EntityRoute::New,
            EntityRoute::Edit(9u32),
        ] {
            assert_eq!(EntityRoute::parse("note", &route.path("note")), Some(route));
        }
        assert_eq!(EntityRoute::<u32>::parse("note", "/note/"), Some(EntityRoute::List));
    }

    #[test]
    fn rejects_foreign_paths() {
        assert_eq!(EntityRoute::<u32>::parse("note", "notes"), None);
        assert_eq!(EntityRoute::<u32>::parse("note", "note/abc/view"), None);
        assert_eq!(EntityRoute::<u32>::parse("note", "note/1/delete"), None);
        assert_eq!(EntityRoute::<u32>::parse("note", "order/1/view"), None);
    }

    #[tokio::test]
    async fn resolves_entities() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_find(2).return_ok(HttpResponse::ok(Note::stored(2)));
        let client = NoteClient::new(mock.client());

        assert_eq!(resolve::<Note, _>(EntityRoute::List, &client).await.unwrap(), Resolved::List);
        assert_eq!(
            resolve::<Note, _>(EntityRoute::New, &client).await.unwrap(),
            Resolved::Entity(Note::default())
        );
        assert_eq!(
            resolve::<Note, _>(EntityRoute::Edit(2), &client).await.unwrap(),
            Resolved::Entity(Note::stored(2))
        );
        mock.verify();
    }
}
