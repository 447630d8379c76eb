//! # Views
//!
//! Headless screen models shared by every resource: a list, a delete confirmation, a
//! detail view, an edit form and the routes between them. Each is generic over a
//! [`RestEntity`](crate::RestEntity) and the [`EntityClient`](crate::EntityClient) that
//! serves it, so a resource only has to provide those two.

pub mod detail;
pub mod dialog;
pub mod edit;
pub mod list;
pub mod route;

pub use detail::DetailView;
pub use dialog::{DeleteDialog, DialogState};
pub use edit::EditForm;
pub use list::{ListState, ListView, LoadPhase};
pub use route::{resolve, EntityRoute, Resolved};
