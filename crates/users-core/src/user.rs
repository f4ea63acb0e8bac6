//! The `User` entity and its caller-editable fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned user identifier. Monotonic, never reused after deletion.
pub type UserId = i64;

/// The fields a caller may set. Produced only by [`crate::schema`] validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
  pub name:  String,
  pub email: String,
}

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         UserId,
  #[serde(flatten)]
  pub fields:     UserFields,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
