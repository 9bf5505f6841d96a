//! Error type for `starling-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// UNIQUE violation on the category name — either a repeat insert or the
  /// losing side of a concurrent check-then-insert race.
  #[error("category {0:?} already exists")]
  DuplicateCategory(String),

  /// Enrichment back-fill addressed a revision row that does not exist.
  #[error("revision not found: {0}")]
  RevisionNotFound(i64),
}

impl From<Error> for starling_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateCategory(name) => {
        starling_core::Error::CategoryExists(name)
      }
      other => starling_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
