//! Error types for `users-core`.

use thiserror::Error;

use crate::{schema::FieldErrors, user::UserId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  NotFound(UserId),

  #[error("validation failed: {0}")]
  ValidationFailed(FieldErrors),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
