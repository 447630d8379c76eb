//! # List View
//!
//! The list component for any [`RestEntity`]: it loads the collection through an
//! [`EntityClient`], reloads whenever the entity's list-modified topic is published on
//! the [`EventBus`], and releases that subscription when torn down.
//!
//! ## States
//!
//! ```text
//!   Idle(None) --init/load_all--> Loading --response--> Idle(Some(list))
//!                                        \--failure---> Idle(previous list, last_error)
//! ```
//!
//! The view is `Loading` while at least one query is outstanding. Overlapping loads are
//! not sequenced: whichever response arrives last replaces the list.
//!
//! Renderers observe changes through [`ListView::watch`]; every successful load bumps
//! [`ListState::revision`].

use crate::client_trait::EntityClient;
use crate::entity::RestEntity;
use crate::events::{EventBus, SubscriptionHandle};
use crate::options::RequestOptions;
use crate::response::PageControls;
use crate::view::dialog::DeleteDialog;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Whether a load is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
}

/// Everything a renderer needs to draw the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    /// `None` until the first successful load.
    pub entities: Option<Vec<T>>,
    pub in_flight: usize,
    /// Pagination links of the last response (`rel -> page`), from the `Link` header or,
    /// failing that, from the envelope's page controls.
    pub links: BTreeMap<String, u32>,
    pub total_count: Option<u64>,
    /// Hypermedia controls of the last response, as sent.
    pub controls: Option<Value>,
    pub page: Option<PageControls>,
    pub last_error: Option<String>,
    pub revision: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            entities: None,
            in_flight: 0,
            links: BTreeMap::new(),
            total_count: None,
            controls: None,
            page: None,
            last_error: None,
            revision: 0,
        }
    }
}

impl<T> ListState<T> {
    pub fn phase(&self) -> LoadPhase {
        if self.in_flight > 0 {
            LoadPhase::Loading
        } else {
            LoadPhase::Idle
        }
    }
}

/// Shared between the view and its reload task.
struct Loader<T: RestEntity, C> {
    client: C,
    state: Arc<watch::Sender<ListState<T>>>,
    options: Arc<Mutex<RequestOptions>>,
}

impl<T: RestEntity, C: Clone> Clone for Loader<T, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            state: self.state.clone(),
            options: self.options.clone(),
        }
    }
}

impl<T: RestEntity, C: EntityClient<T>> Loader<T, C> {
    fn options(&self) -> RequestOptions {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn load(&self) -> Result<(), C::Error> {
        let options = self.options();
        let in_flight = InFlight::start(&*self.state);

        let result = self.client.query(options).await;

        match result {
            Ok(res) => {
                let page = res.page_controls();
                let mut links = res.links().unwrap_or_else(|e| {
                    debug!(error = %e, "Ignoring unparseable Link header");
                    BTreeMap::new()
                });
                if links.is_empty() {
                    links = page.map(|p| p.links()).unwrap_or_default();
                }
                let total_count = res.total_count();
                let controls = res.controls;
                let entities = res.body.unwrap_or_default();
                let count = entities.len();
                in_flight.finish(|s| {
                    s.entities = Some(entities);
                    s.links = links;
                    s.total_count = total_count;
                    s.controls = controls;
                    s.page = page;
                    s.last_error = None;
                    s.revision += 1;
                });
                debug!(resource = T::RESOURCE_PATH, count, "List loaded");
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                in_flight.finish(|s| s.last_error = Some(message));
                Err(e)
            }
        }
    }
}

/// One outstanding query. The count goes back down when the load finishes or when its
/// future is dropped (task aborted, caller timed out).
struct InFlight<'a, T> {
    state: &'a watch::Sender<ListState<T>>,
    armed: bool,
}

impl<'a, T> InFlight<'a, T> {
    fn start(state: &'a watch::Sender<ListState<T>>) -> Self {
        state.send_modify(|s| s.in_flight += 1);
        Self { state, armed: true }
    }

    /// Applies `update` and the decrement as a single state change.
    fn finish(mut self, update: impl FnOnce(&mut ListState<T>)) {
        self.armed = false;
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            update(s);
        });
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.state
                .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
        }
    }
}

struct Listener {
    handle: SubscriptionHandle,
    task: JoinHandle<()>,
}

/// List component for `T`, backed by client `C`.
pub struct ListView<T: RestEntity, C: EntityClient<T> + Clone + 'static> {
    loader: Loader<T, C>,
    bus: EventBus,
    listener: Option<Listener>,
}

impl<T, C> ListView<T, C>
where
    T: RestEntity,
    C: EntityClient<T> + Clone + 'static,
{
    pub fn new(client: C, bus: EventBus) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            loader: Loader {
                client,
                state: Arc::new(state),
                options: Arc::new(Mutex::new(RequestOptions::new())),
            },
            bus,
            listener: None,
        }
    }

    /// Uses `options` for this and every later load.
    pub fn with_options(self, options: RequestOptions) -> Self {
        self.set_options(options);
        self
    }

    pub fn set_options(&self, options: RequestOptions) {
        *self
            .loader
            .options
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = options;
    }

    pub fn options(&self) -> RequestOptions {
        self.loader.options()
    }

    /// Activates the view: listens for list modifications, then loads once.
    ///
    /// The listener is registered first, so a modification published while the initial
    /// load is in flight still causes a reload.
    pub async fn init(&mut self) -> Result<(), C::Error> {
        self.register_change();
        self.load_all().await
    }

    /// Loads the collection. On failure the previous list stays in place.
    pub async fn load_all(&self) -> Result<(), C::Error> {
        self.loader.load().await
    }

    /// Switches to `page` (keeping size/sort) and loads it.
    pub async fn load_page(&self, page: u32) -> Result<(), C::Error> {
        {
            let mut options = self
                .loader
                .options
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            options.page = Some(page);
        }
        self.load_all().await
    }

    /// Subscribes to `T::LIST_MODIFIED_EVENT`; every event triggers one reload.
    /// Calling it again while subscribed does nothing.
    pub fn register_change(&mut self) {
        if self.listener.is_some() {
            return;
        }

        let (handle, mut events) = self.bus.subscribe(T::LIST_MODIFIED_EVENT).split();
        let loader = self.loader.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                debug!(topic = %event.name, "Reloading after list modification");
                if let Err(e) = loader.load().await {
                    warn!(resource = T::RESOURCE_PATH, error = %e, "Reload failed");
                }
            }
        });
        info!(resource = T::RESOURCE_PATH, topic = T::LIST_MODIFIED_EVENT, "Listening for changes");
        self.listener = Some(Listener { handle, task });
    }

    /// Tears the view down: unsubscribes at once and stops the reload task.
    pub fn destroy(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.handle.unsubscribe();
            listener.task.abort();
            debug!(resource = T::RESOURCE_PATH, "List view destroyed");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// The identifier used to key rendered rows.
    pub fn track_id(&self, _index: usize, item: &T) -> Option<T::Id> {
        item.id()
    }

    /// Opens the delete confirmation for `entity`.
    pub fn delete(&self, entity: T) -> DeleteDialog<T, C> {
        DeleteDialog::open(self.loader.client.clone(), self.bus.clone(), entity)
    }

    /// The last loaded list, `None` before the first successful load.
    pub fn entities(&self) -> Option<Vec<T>> {
        self.loader.state.borrow().entities.clone()
    }

    pub fn state(&self) -> ListState<T> {
        self.loader.state.borrow().clone()
    }

    pub fn phase(&self) -> LoadPhase {
        self.loader.state.borrow().phase()
    }

    /// A receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<ListState<T>> {
        self.loader.state.subscribe()
    }

    pub fn client(&self) -> &C {
        &self.loader.client
    }
}

impl<T, C> Drop for ListView<T, C>
where
    T: RestEntity,
    C: EntityClient<T> + Clone + 'static,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{create_mock_client, expect_query};
    use crate::view::tests_support::{Note, NoteClient};
    use crate::{HttpResponse, ResourceRequest};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn view() -> (
        ListView<Note, NoteClient>,
        mpsc::Receiver<ResourceRequest<Note>>,
        EventBus,
    ) {
        let (client, receiver) = create_mock_client::<Note>(10);
        let bus = EventBus::new();
        (ListView::new(NoteClient::new(client), bus.clone()), receiver, bus)
    }

    #[tokio::test]
    async fn starts_idle_with_no_list() {
        let (view, _rx, _bus) = view();
        assert_eq!(view.phase(), LoadPhase::Idle);
        assert!(view.entities().is_none());
        assert!(!view.is_listening());
    }

    #[tokio::test]
    async fn absent_body_becomes_empty_list() {
        let (view, mut rx, _bus) = view();

        let (result, ()) = tokio::join!(view.load_all(), async {
            let (_, _, responder) = expect_query(&mut rx).await.expect("Expected Query request");
            responder.send(Ok(HttpResponse::empty(200))).unwrap();
        });

        result.unwrap();
        assert_eq!(view.entities(), Some(vec![]));
        assert_eq!(view.state().revision, 1);
    }

    #[tokio::test]
    async fn loading_while_request_outstanding() {
        let (view, mut rx, _bus) = view();
        let mut watch = view.watch();

        let (result, ()) = tokio::join!(view.load_all(), async {
            let (_, _, responder) = expect_query(&mut rx).await.unwrap();
            watch.wait_for(|s| s.phase() == LoadPhase::Loading).await.unwrap();
            responder.send(Ok(HttpResponse::ok(vec![Note::stored(1)]))).unwrap();
        });

        result.unwrap();
        assert_eq!(view.phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn failure_keeps_previous_list() {
        let (view, mut rx, _bus) = view();

        let (first, ()) = tokio::join!(view.load_all(), async {
            let (_, _, responder) = expect_query(&mut rx).await.unwrap();
            responder.send(Ok(HttpResponse::ok(vec![Note::stored(1)]))).unwrap();
        });
        first.unwrap();

        let (second, ()) = tokio::join!(view.load_all(), async {
            let (_, _, responder) = expect_query(&mut rx).await.unwrap();
            responder
                .send(Err(crate::FrameworkError::Transport("connection refused".into())))
                .unwrap();
        });

        assert!(second.is_err());
        let state = view.state();
        assert_eq!(state.entities, Some(vec![Note::stored(1)]));
        assert!(state.last_error.as_deref().unwrap().contains("connection refused"));
        assert_eq!(state.revision, 1);
        assert_eq!(state.phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn last_response_to_arrive_wins() {
        let (view, mut rx, _bus) = view();

        let (a, b, ()) = tokio::join!(view.load_all(), view.load_all(), async {
            let (_, _, first) = expect_query(&mut rx).await.unwrap();
            let (_, _, second) = expect_query(&mut rx).await.unwrap();
            // Answer the later request first.
            second.send(Ok(HttpResponse::ok(vec![Note::stored(2)]))).unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
            first.send(Ok(HttpResponse::ok(vec![Note::stored(1)]))).unwrap();
        });

        a.unwrap();
        b.unwrap();
        assert_eq!(view.entities(), Some(vec![Note::stored(1)]));
        assert_eq!(view.state().revision, 2);
    }

    #[tokio::test]
    async fn options_and_pagination_flow_through() {
        let (view, mut rx, _bus) = view();
        let view = view.with_options(RequestOptions::new().size(2).sort("id,asc"));

        let (result, ()) = tokio::join!(view.load_page(3), async {
            let (path, options, responder) = expect_query(&mut rx).await.unwrap();
            assert_eq!(path, "api/notes");
            assert_eq!(options.page, Some(3));
            assert_eq!(options.size, Some(2));
            assert_eq!(options.sort, vec!["id,asc".to_string()]);
            let res = HttpResponse::ok(vec![Note::stored(7), Note::stored(8)])
                .with_header("link", r#"<api/notes?page=4&size=2>; rel="next",<api/notes?page=0&size=2>; rel="first""#)
                .with_header("x-total-count", "10");
            responder.send(Ok(res)).unwrap();
        });

        result.unwrap();
        let state = view.state();
        assert_eq!(state.links.get("next"), Some(&4));
        assert_eq!(state.total_count, Some(10));
    }

    #[tokio::test]
    async fn envelope_page_controls_become_links() {
        let (view, mut rx, _bus) = view();
        let controls = serde_json::json!({
            "paths": {"/notes": {"get": {"totalPages": 5, "currentPage": 2, "pageSize": 20}}}
        });

        let (result, ()) = tokio::join!(view.load_page(2), async {
            let (_, _, responder) = expect_query(&mut rx).await.unwrap();
            let res = HttpResponse::ok(vec![Note::stored(1)]).with_controls(controls.clone());
            responder.send(Ok(res)).unwrap();
        });

        result.unwrap();
        let state = view.state();
        assert_eq!(state.controls, Some(controls));
        assert_eq!(
            state.page,
            Some(PageControls {
                current_page: 2,
                total_pages: 5,
                page_size: Some(20)
            })
        );
        assert_eq!(state.links.get("next"), Some(&3));
        assert_eq!(state.links.get("prev"), Some(&1));
        assert_eq!(state.links.get("last"), Some(&4));
        assert_eq!(state.total_count, None);
    }

    #[tokio::test]
    async fn timed_out_load_returns_to_idle() {
        let (view, mut rx, _bus) = view();

        let outcome = tokio::time::timeout(Duration::from_millis(20), view.load_all()).await;
        assert!(outcome.is_err());
        // The query was sent but is never answered.
        let (_, _, _responder) = expect_query(&mut rx).await.unwrap();

        let state = view.state();
        assert_eq!(state.in_flight, 0);
        assert_eq!(state.phase(), LoadPhase::Idle);
        assert!(state.entities.is_none());
    }

    #[tokio::test]
    async fn destroy_during_reload_returns_to_idle() {
        let (mut view, mut rx, bus) = view();
        let mut watch = view.watch();
        view.register_change();

        bus.publish(Note::LIST_MODIFIED_EVENT);
        let (_, _, _responder) = expect_query(&mut rx).await.unwrap();
        watch.wait_for(|s| s.phase() == LoadPhase::Loading).await.unwrap();

        view.destroy();
        tokio::time::timeout(
            Duration::from_secs(1),
            watch.wait_for(|s| s.phase() == LoadPhase::Idle),
        )
        .await
        .expect("aborted reload should leave Loading")
        .unwrap();
        assert_eq!(view.state().in_flight, 0);
    }

    #[tokio::test]
    async fn register_change_is_idempotent() {
        let (mut view, _rx, bus) = view();
        view.register_change();
        view.register_change();
        assert_eq!(bus.subscriber_count(Note::LIST_MODIFIED_EVENT), 1);
        drop(view);
        assert_eq!(bus.subscriber_count(Note::LIST_MODIFIED_EVENT), 0);
    }

    #[tokio::test]
    async fn track_id_returns_identifier() {
        let (view, _rx, _bus) = view();
        assert_eq!(view.track_id(0, &Note::stored(42)), Some(42));
        assert_eq!(view.track_id(1, &Note::draft("x")), None);
    }
}
