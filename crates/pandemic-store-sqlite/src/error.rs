//! Error type for `pandemic-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl Error {
  /// `true` if the failure was a `UNIQUE`, `NOT NULL` or foreign-key
  /// violation rather than an I/O or driver problem.
  #[cfg(test)]
  pub(crate) fn is_constraint_violation(&self) -> bool {
    matches!(
      self,
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _)
      )) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
