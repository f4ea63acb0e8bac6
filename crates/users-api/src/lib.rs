//! JSON REST API for the user resource.
//!
//! Exposes an axum [`Router`] backed by any [`users_core::store::UserStore`].
//! TLS, tracing layers and other transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = users_api::api_router(Arc::new(store));
//! ```

pub mod error;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use users_core::{service::UserService, store::UserStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: UserStore + 'static,
{
  Router::new()
    .route("/users/", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}/",
      get(users::retrieve::<S>)
        .put(users::update::<S>)
        .patch(users::partial_update::<S>)
        .delete(users::destroy::<S>),
    )
    .with_state(UserService::new(store))
}
