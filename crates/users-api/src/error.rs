//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use users_core::schema::FieldErrors;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found")]
  NotFound,

  /// Schema rejected the body; rendered as a field → messages map.
  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("unreadable body: {0}")]
  Body(#[from] JsonRejection),

  #[error("bad query string: {0}")]
  Query(#[from] QueryRejection),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<users_core::Error> for ApiError {
  fn from(e: users_core::Error) -> Self {
    match e {
      users_core::Error::NotFound(_) => ApiError::NotFound,
      users_core::Error::ValidationFailed(errors) => ApiError::Validation(errors),
      users_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound => {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })))
          .into_response()
      }
      ApiError::Validation(errors) => {
        tracing::debug!(%errors, "rejected user fields");
        (StatusCode::BAD_REQUEST, Json(errors)).into_response()
      }
      ApiError::Body(rejection) => {
        let detail = format!("JSON parse error - {}", rejection.body_text());
        (rejection.status(), Json(json!({ "detail": detail }))).into_response()
      }
      ApiError::Query(rejection) => {
        let detail = rejection.body_text();
        (rejection.status(), Json(json!({ "detail": detail }))).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "detail": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}
