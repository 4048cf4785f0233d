//! SQLite backend for the brewlog coffee journal.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Engine errors never leave this crate:
//! they are classified into [`ErrorKind`] at the operation boundary.

mod backup;
mod encode;
mod patch;
mod schema;
mod store;

pub mod error;

pub use error::{Error, ErrorKind, Result};
pub use store::{SqliteStore, default_db_path};
