//! Error type for `brewlog-store-sqlite`.
//!
//! rusqlite and tokio-rusqlite errors are converted into message-carrying
//! variants here, so callers only ever see this crate's types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The payload failed validation before reaching the database.
  #[error("invalid input: {0}")]
  Invalid(#[from] brewlog_core::Error),

  /// SQLite refused the statement: foreign key, `CHECK` or `NOT NULL`.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("database error: {0}")]
  Database(String),

  /// A stored row could not be turned back into a domain value.
  #[error("corrupt row: {0}")]
  Decode(String),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store is not backed by a file")]
  NotFileBacked,

  #[error("no per-user data directory is available on this platform")]
  NoDataDir,
}

/// The coarse failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The store refused the data; retrying the same call will fail again.
  ConstraintViolation,
  /// The store could not be reached or read.
  StoreUnavailable,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Invalid(_) | Self::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
      Self::Database(_)
      | Self::Decode(_)
      | Self::Io(_)
      | Self::NotFileBacked
      | Self::NoDataDir => ErrorKind::StoreUnavailable,
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    match &e {
      rusqlite::Error::SqliteFailure(failure, _)
        if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Self::ConstraintViolation(e.to_string())
      }
      _ => Self::Database(e.to_string()),
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(e) => e.into(),
      tokio_rusqlite::Error::Close((_, e)) => e.into(),
      other => Self::Database(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
