//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the [`ResourceClient`](crate::ResourceClient) and the
//! [`ResourceGateway`](crate::ResourceGateway).

use crate::entity::RestEntity;
use crate::error::FrameworkError;
use crate::options::RequestOptions;
use crate::response::HttpResponse;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by gateways.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message sent to a gateway to perform one REST call.
///
/// # The CRUD Pattern
/// The variants map onto the five verbs every resource supports:
///
/// - **Query**: `GET` on a collection (the resource itself or a nested one such as
///   `api/customers/{id}/orders`), with paging/sort options.
/// - **Find**: `GET {resource}/{id}`.
/// - **Create**: `POST {resource}` with the full entity.
/// - **Update**: `PUT {resource}/{id}` with the full entity.
/// - **Delete**: `DELETE {resource}/{id}`.
///
/// The identifier invariants (no id on create, an id on update) are checked by the
/// client before a message is ever built, so the gateway only moves bytes.
#[derive(Debug)]
pub enum ResourceRequest<T: RestEntity> {
    Query {
        path: String,
        options: RequestOptions,
        respond_to: Response<HttpResponse<Vec<T>>>,
    },
    Find {
        id: T::Id,
        respond_to: Response<HttpResponse<T>>,
    },
    Create {
        entity: T,
        respond_to: Response<HttpResponse<T>>,
    },
    Update {
        id: T::Id,
        entity: T,
        respond_to: Response<HttpResponse<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<HttpResponse<()>>,
    },
}
