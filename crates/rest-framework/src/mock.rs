//! # Mocks & Testing Guide
//!
//! Three levels of test double, from the innermost seam outwards:
//!
//! | Double | Replaces | Use it to test |
//! |--------|----------|----------------|
//! | [`create_mock_client`] + `expect_*` | the gateway | views and clients, step by step, answering each request by hand |
//! | [`MockClient`] | the gateway | the same, with expectations queued up front and [`MockClient::verify`] |
//! | [`MockTransport`] | the network | gateways and whole systems, checking the exact HTTP requests |
//!
//! ## Answering requests by hand
//!
//! The receiver half of [`create_mock_client`] sees every [`ResourceRequest`] the client
//! sends. The `expect_*` helpers pop the next one and hand back its payload together with
//! the responder, so a test decides what comes back and when:
//!
//! ```rust,ignore
//! let (client, mut rx) = create_mock_client::<Customer>(10);
//! let view = ListView::new(CustomerClient::new(client), bus);
//!
//! let (result, ()) = tokio::join!(view.load_all(), async {
//!     let (path, _options, responder) = expect_query(&mut rx).await.unwrap();
//!     assert_eq!(path, "api/customers");
//!     responder.send(Ok(HttpResponse::ok(vec![customer]))).unwrap();
//! });
//! ```
//!
//! Holding the responder back is how "loading" states and out-of-order responses are tested.
//!
//! ## Fluent expectations
//!
//! ```rust,ignore
//! let mut mock = MockClient::<Customer>::new();
//! mock.expect_find(CustomerId(1)).return_ok(HttpResponse::ok(customer));
//! mock.expect_delete(CustomerId(1)).return_err(FrameworkError::NotFound("api/customers/1".into()));
//!
//! let client = CustomerClient::new(mock.client());
//! // ... exercise the code under test ...
//! mock.verify(); // every expectation was consumed
//! ```
//!
//! ## Faking the backend
//!
//! [`MockTransport`] answers by method and path and records every request, so tests can
//! assert on the exact URL, query string and JSON payload a gateway produced.

use crate::client::ResourceClient;
use crate::entity::RestEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Response};
use crate::options::RequestOptions;
use crate::response::{HttpResponse, RawResponse};
use crate::transport::{HttpRequest, Transport};
use async_trait::async_trait;
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: RestEntity> {
    Query {
        response: Result<HttpResponse<Vec<T>>, FrameworkError>,
    },
    Find {
        id: T::Id,
        response: Result<HttpResponse<T>, FrameworkError>,
    },
    Create {
        response: Result<HttpResponse<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<HttpResponse<T>, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<HttpResponse<()>, FrameworkError>,
    },
}

impl<T: RestEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Query { .. } => "Query",
            Expectation::Find { .. } => "Find",
            Expectation::Create { .. } => "Create",
            Expectation::Update { .. } => "Update",
            Expectation::Delete { .. } => "Delete",
        }
    }
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation (wrong verb or wrong id) panics the mock task, which the caller sees as
/// [`FrameworkError::GatewayDropped`].
pub struct MockClient<T: RestEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: RestEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RestEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();
                answer(request, expectation);
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_query(&mut self) -> QueryExpectationBuilder<T> {
        QueryExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_find(&mut self, id: T::Id) -> FindExpectationBuilder<T> {
        FindExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_create(&mut self) -> CreateExpectationBuilder<T> {
        CreateExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_update(&mut self, id: T::Id) -> UpdateExpectationBuilder<T> {
        UpdateExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_delete(&mut self, id: T::Id) -> DeleteExpectationBuilder<T> {
        DeleteExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<_> = exps.iter().map(Expectation::name).collect();
            panic!("Not all expectations were met. Remaining: {pending:?}");
        }
    }
}

fn reply<R>(respond_to: Response<R>, response: Result<R, FrameworkError>) {
    let _ = respond_to.send(response);
}

fn answer<T: RestEntity>(request: ResourceRequest<T>, expectation: Option<Expectation<T>>) {
    match (request, expectation) {
        (ResourceRequest::Query { respond_to, .. }, Some(Expectation::Query { response })) => {
            reply(respond_to, response)
        }
        (ResourceRequest::Find { id, respond_to }, Some(Expectation::Find { id: expected, response }))
            if id == expected =>
        {
            reply(respond_to, response)
        }
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            reply(respond_to, response)
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Some(Expectation::Update { id: expected, response }),
        ) if id == expected => reply(respond_to, response),
        (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete { id: expected, response }))
            if id == expected =>
        {
            reply(respond_to, response)
        }
        (request, expectation) => panic!(
            "Unexpected request {:?}, expected {:?}",
            request_name(&request),
            expectation.as_ref().map(Expectation::name)
        ),
    }
}

fn request_name<T: RestEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Query { path, .. } => format!("Query {path}"),
        ResourceRequest::Find { id, .. } => format!("Find {id}"),
        ResourceRequest::Create { .. } => "Create".to_string(),
        ResourceRequest::Update { id, .. } => format!("Update {id}"),
        ResourceRequest::Delete { id, .. } => format!("Delete {id}"),
    }
}

/// Builder for `query` expectations.
pub struct QueryExpectationBuilder<T: RestEntity> {
    expectations: Expectations<T>,
}

impl<T: RestEntity> QueryExpectationBuilder<T> {
    pub fn return_ok(self, response: HttpResponse<Vec<T>>) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse<Vec<T>>, FrameworkError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Query { response });
    }
}

/// Builder for `find` expectations.
pub struct FindExpectationBuilder<T: RestEntity> {
    id: T::Id,
    expectations: Expectations<T>,
}

impl<T: RestEntity> FindExpectationBuilder<T> {
    pub fn return_ok(self, response: HttpResponse<T>) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse<T>, FrameworkError>) {
        self.expectations.lock().unwrap().push_back(Expectation::Find {
            id: self.id,
            response,
        });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<T: RestEntity> {
    expectations: Expectations<T>,
}

impl<T: RestEntity> CreateExpectationBuilder<T> {
    pub fn return_ok(self, response: HttpResponse<T>) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse<T>, FrameworkError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Create { response });
    }
}

/// Builder for `update` expectations.
pub struct UpdateExpectationBuilder<T: RestEntity> {
    id: T::Id,
    expectations: Expectations<T>,
}

impl<T: RestEntity> UpdateExpectationBuilder<T> {
    pub fn return_ok(self, response: HttpResponse<T>) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse<T>, FrameworkError>) {
        self.expectations.lock().unwrap().push_back(Expectation::Update {
            id: self.id,
            response,
        });
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder<T: RestEntity> {
    id: T::Id,
    expectations: Expectations<T>,
}

impl<T: RestEntity> DeleteExpectationBuilder<T> {
    pub fn return_ok(self, response: HttpResponse<()>) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse<()>, FrameworkError>) {
        self.expectations.lock().unwrap().push_back(Expectation::Delete {
            id: self.id,
            response,
        });
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client whose requests land on the returned receiver instead of a gateway.
pub fn create_mock_client<T: RestEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Query: `(path, options, responder)`.
pub async fn expect_query<T: RestEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(String, RequestOptions, Response<HttpResponse<Vec<T>>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Query {
            path,
            options,
            respond_to,
        }) => Some((path, options, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Find.
pub async fn expect_find<T: RestEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<HttpResponse<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Find { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Create.
pub async fn expect_create<T: RestEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T, Response<HttpResponse<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { entity, respond_to }) => Some((entity, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Update.
pub async fn expect_update<T: RestEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T, Response<HttpResponse<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            entity,
            respond_to,
        }) => Some((id, entity, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Delete.
pub async fn expect_delete<T: RestEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<HttpResponse<()>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

// =============================================================================
// TRANSPORT DOUBLE
// =============================================================================

#[derive(Default)]
struct TransportState {
    routes: HashMap<(Method, String), VecDeque<Result<RawResponse, FrameworkError>>>,
    requests: Vec<HttpRequest>,
}

/// In-memory [`Transport`] that answers from queued responses and records every request.
///
/// Responses are queued per `(method, path)` and consumed in order; the last one queued
/// for a route keeps answering once the others are used up. A request with nothing queued
/// fails with [`FrameworkError::Transport`].
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `response` for `method path`.
    pub fn on(&self, method: Method, path: &str, response: RawResponse) -> &Self {
        self.push(method, path, Ok(response))
    }

    /// Queues a transport-level failure for `method path`.
    pub fn fail(&self, method: Method, path: &str, error: FrameworkError) -> &Self {
        self.push(method, path, Err(error))
    }

    fn push(
        &self,
        method: Method,
        path: &str,
        response: Result<RawResponse, FrameworkError>,
    ) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests received for `method path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, FrameworkError> {
        let mut state = self.state.lock().unwrap();
        let key = (request.method.clone(), request.path.clone());
        state.requests.push(request);

        let Some(queue) = state.routes.get_mut(&key) else {
            return Err(FrameworkError::Transport(format!(
                "no response queued for {} {}",
                key.0, key.1
            )));
        };
        match queue.len() {
            0 => Err(FrameworkError::Transport(format!(
                "no response queued for {} {}",
                key.0, key.1
            ))),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap_or_else(|| {
                Err(FrameworkError::Transport("response queue drained".into()))
            }),
        }
    }
}
