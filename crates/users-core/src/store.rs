//! The `UserStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `users-store-sqlite`).
//! The service and REST layers depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use serde::Deserialize;

use crate::user::{User, UserFields, UserId};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Optional window over [`UserStore::list`]. Both bounds default to "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable user store.
///
/// Fields handed to the store have already passed schema validation. Each
/// write runs in a single store-level transaction.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new user. The store assigns `id` and both timestamps.
  fn insert(
    &self,
    fields: UserFields,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// List users, most recently created (highest id) first.
  fn list(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Replace the editable fields of an existing user and bump `updated_at`.
  /// Returns `None` if the user does not exist.
  fn update(
    &self,
    id: UserId,
    fields: UserFields,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Hard-delete a user. Returns `false` if the user did not exist.
  fn delete(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
