//! Error taxonomy for `starling-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("category not found: {0}")]
  CategoryNotFound(i64),

  #[error("category {0:?} already exists")]
  CategoryExists(String),

  #[error("page size must be a positive integer, got {0}")]
  InvalidPageSize(i64),

  #[error("limit must be a positive integer, got {0}")]
  InvalidLimit(i64),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
