//! [`UserService`]: the five resource operations over a [`UserStore`].
//!
//! Mutating operations answer with an [`Envelope`] carrying a human-readable
//! message; reads return bare users.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
  Error, Result,
  schema,
  store::{Page, UserStore},
  user::{User, UserId},
};

pub const CREATED_MESSAGE: &str = "User created successfully";
pub const UPDATED_MESSAGE: &str = "User updated successfully";
pub const DELETED_MESSAGE: &str = "User deleted successfully";

/// Response body of a mutating operation. `data` is omitted on delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
  pub message: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<User>,
}

/// Explicit handle over a store; holds no state of its own.
pub struct UserService<S> {
  store: Arc<S>,
}

impl<S> Clone for UserService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: UserStore> UserService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// All users, highest id first.
  pub async fn list(&self, page: Page) -> Result<Vec<User>> {
    self.store.list(page).await.map_err(store_err)
  }

  pub async fn retrieve(&self, id: UserId) -> Result<User> {
    self
      .store
      .get(id)
      .await
      .map_err(store_err)?
      .ok_or(Error::NotFound(id))
  }

  /// Validate `candidate` and persist it as a new user.
  pub async fn create(&self, candidate: &Value) -> Result<Envelope> {
    let fields = schema::validate(candidate)
      .into_result()
      .map_err(Error::ValidationFailed)?;
    let user = self.store.insert(fields).await.map_err(store_err)?;
    Ok(Envelope {
      message: CREATED_MESSAGE,
      data:    Some(user),
    })
  }

  /// Replace (`partial == false`) or patch (`partial == true`) a user.
  ///
  /// A full update must carry every field. A partial update is merged over
  /// the stored fields and the merged result is validated as a whole.
  pub async fn update(
    &self,
    id:        UserId,
    candidate: &Value,
    partial:   bool,
  ) -> Result<Envelope> {
    let existing = self.retrieve(id).await?;

    let validation = if partial {
      schema::validate_partial(&existing.fields, candidate)
    } else {
      schema::validate(candidate)
    };
    let fields = validation.into_result().map_err(Error::ValidationFailed)?;

    let user = self
      .store
      .update(id, fields)
      .await
      .map_err(store_err)?
      .ok_or(Error::NotFound(id))?;
    Ok(Envelope {
      message: UPDATED_MESSAGE,
      data:    Some(user),
    })
  }

  pub async fn destroy(&self, id: UserId) -> Result<Envelope> {
    if !self.store.delete(id).await.map_err(store_err)? {
      return Err(Error::NotFound(id));
    }
    Ok(Envelope {
      message: DELETED_MESSAGE,
      data:    None,
    })
  }
}

fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}
