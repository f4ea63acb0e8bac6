//! Conversions between domain types and the plain-text representations
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use users_core::user::{User, UserFields, UserId};

use crate::{Error, Result};

/// Column list shared by every `SELECT` that feeds [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `users` row as read from SQLite, before timestamp decoding.
pub struct RawUser {
  pub id:         UserId,
  pub name:       String,
  pub email:      String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         self.id,
      fields:     UserFields {
        name:  self.name,
        email: self.email,
      },
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
