//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Convert a backend error through the core taxonomy.
  pub fn store<E: Into<starling_core::Error>>(e: E) -> Self {
    Self::from(e.into())
  }
}

impl From<starling_core::Error> for ApiError {
  fn from(e: starling_core::Error) -> Self {
    use starling_core::Error;
    match e {
      Error::CategoryNotFound(id) => {
        ApiError::NotFound(format!("category {id} not found"))
      }
      Error::CategoryExists(name) => {
        ApiError::Conflict(format!("category {name:?} already exists"))
      }
      Error::InvalidPageSize(_) | Error::InvalidLimit(_) => {
        ApiError::InvalidArgument(e.to_string())
      }
      Error::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::InvalidArgument(m) => {
        (StatusCode::UNPROCESSABLE_ENTITY, m.clone())
      }
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
