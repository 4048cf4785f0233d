//! Whole-file export and import of the journal.
//!
//! Both directions go through SQLite's online backup API into a temporary
//! file in the destination directory, which is then renamed into place, so an
//! interrupted copy never leaves a half-written journal behind.

use std::path::{Path, PathBuf};

use rusqlite::{DatabaseName, OpenFlags};
use tempfile::NamedTempFile;

use crate::{Error, Result, SqliteStore};

/// A temporary file next to `target`, on the same file system so the final
/// rename is atomic.
fn sibling_temp(target: &Path) -> Result<NamedTempFile> {
  let dir = match target.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
    _ => PathBuf::from("."),
  };
  Ok(
    tempfile::Builder::new()
      .prefix(".brewlog-")
      .suffix(".db.tmp")
      .tempfile_in(dir)?,
  )
}

/// Copy the database open on `conn` into the file at `dest`.
async fn backup_into(conn: &tokio_rusqlite::Connection, dest: PathBuf) -> Result<()> {
  conn
    .call(move |conn| {
      conn.backup(DatabaseName::Main, &dest, None)?;
      Ok(())
    })
    .await?;
  Ok(())
}

impl SqliteStore {
  /// Write a consistent copy of the journal to `dest`, replacing any file
  /// already there.
  pub async fn export_to(&self, dest: impl AsRef<Path>) -> Result<()> {
    let dest = dest.as_ref();
    let tmp = sibling_temp(dest)?;

    backup_into(&self.conn, tmp.path().to_path_buf()).await?;
    tmp.persist(dest).map_err(|e| Error::Io(e.error))?;

    tracing::info!(dest = %dest.display(), "exported coffee journal");
    Ok(())
  }

  /// Replace the journal with the contents of the SQLite file at `src`.
  ///
  /// Consumes the store: the live connection is closed before the data file
  /// is swapped and a fresh store is returned. If anything fails before the
  /// swap the data file is left as it was.
  pub async fn import_from(self, src: impl AsRef<Path>) -> Result<Self> {
    let data_path = self.path.clone().ok_or(Error::NotFileBacked)?;
    let src = src.as_ref();
    let tmp = sibling_temp(&data_path)?;

    // Read-only, so a mistyped path is an error rather than a new empty file.
    let source = tokio_rusqlite::Connection::open_with_flags(
      src,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .await?;
    backup_into(&source, tmp.path().to_path_buf()).await?;
    source.close().await?;

    // Bring the copy up to the current schema and make sure it is readable
    // before the live file is touched.
    let staged = Self::open(tmp.path()).await?;
    staged.probe().await?;
    staged.close().await?;

    self.close().await?;
    tmp.persist(&data_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(src = %src.display(), "imported coffee journal");
    Self::open(data_path).await
  }
}
