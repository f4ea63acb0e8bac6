//! Handlers for `/users/` endpoints.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/users/`      | Optional `?limit=&offset=`; newest first |
//! | `POST`   | `/users/`      | 201 + envelope |
//! | `GET`    | `/users/{id}/` | 404 if not found |
//! | `PUT`    | `/users/{id}/` | Every field required |
//! | `PATCH`  | `/users/{id}/` | Any subset of fields |
//! | `DELETE` | `/users/{id}/` | 204 + envelope without `data` |
//!
//! An `{id}` that is not an integer cannot name a user and answers 404. On
//! `PUT`/`PATCH` the target is resolved before the body is inspected, so an
//! unknown user answers 404 even when the body is unreadable.

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
};
use serde_json::Value;
use users_core::{
  service::{Envelope, UserService},
  store::{Page, UserStore},
  user::{User, UserId},
};

use crate::error::ApiError;

fn parse_id(raw: &str) -> Result<UserId, ApiError> {
  raw.parse().map_err(|_| ApiError::NotFound)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users/[?limit=<n>][&offset=<n>]`
pub async fn list<S>(
  State(service): State<UserService<S>>,
  query: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: UserStore + 'static,
{
  let Query(page) = query?;
  Ok(Json(service.list(page).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users/`, body: `{"name":"Alice","email":"alice@example.com"}`
pub async fn create<S>(
  State(service): State<UserService<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope>), ApiError>
where
  S: UserStore + 'static,
{
  let Json(candidate) = body?;
  let envelope = service.create(&candidate).await?;
  if let Some(user) = &envelope.data {
    tracing::info!(user_id = user.id, "user created");
  }
  Ok((StatusCode::CREATED, Json(envelope)))
}

// ─── Retrieve ─────────────────────────────────────────────────────────────────

/// `GET /users/{id}/`
pub async fn retrieve<S>(
  State(service): State<UserService<S>>,
  Path(id): Path<String>,
) -> Result<Json<User>, ApiError>
where
  S: UserStore + 'static,
{
  let id = parse_id(&id)?;
  Ok(Json(service.retrieve(id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

async fn apply_update<S>(
  service: UserService<S>,
  raw_id: String,
  body: Result<Json<Value>, JsonRejection>,
  partial: bool,
) -> Result<(StatusCode, Json<Envelope>), ApiError>
where
  S: UserStore + 'static,
{
  let id = parse_id(&raw_id)?;
  let candidate = match body {
    Ok(Json(candidate)) => candidate,
    Err(rejection) => {
      service.retrieve(id).await?;
      return Err(rejection.into());
    }
  };
  let envelope = service.update(id, &candidate, partial).await?;
  tracing::info!(user_id = id, partial, "user updated");
  Ok((StatusCode::OK, Json(envelope)))
}

/// `PUT /users/{id}/`: full replacement.
pub async fn update<S>(
  State(service): State<UserService<S>>,
  Path(id): Path<String>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope>), ApiError>
where
  S: UserStore + 'static,
{
  apply_update(service, id, body, false).await
}

/// `PATCH /users/{id}/`: partial update.
pub async fn partial_update<S>(
  State(service): State<UserService<S>>,
  Path(id): Path<String>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope>), ApiError>
where
  S: UserStore + 'static,
{
  apply_update(service, id, body, true).await
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}/`
pub async fn destroy<S>(
  State(service): State<UserService<S>>,
  Path(id): Path<String>,
) -> Result<(StatusCode, Json<Envelope>), ApiError>
where
  S: UserStore + 'static,
{
  let id = parse_id(&id)?;
  let envelope = service.destroy(id).await?;
  tracing::info!(user_id = id, "user deleted");
  Ok((StatusCode::NO_CONTENT, Json(envelope)))
}
