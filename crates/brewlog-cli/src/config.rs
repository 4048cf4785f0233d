//! Where the journal lives.
//!
//! The data file location is the only setting. It is resolved from, in order:
//! the `--db` flag, `BREWLOG_DB_PATH` or `db_path` in the TOML config file,
//! and finally the per-user data directory.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Shape of the optional config file; every key may also come from a
/// `BREWLOG_`-prefixed environment variable.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub db_path: Option<PathBuf>,
}

impl Settings {
  /// Read `file` (if it exists) and the environment.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("BREWLOG"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}

/// Pick the journal path: explicit flag, then settings, then the default.
pub fn resolve_db_path(flag: Option<&Path>, settings: &Settings) -> anyhow::Result<PathBuf> {
  if let Some(path) = flag.or(settings.db_path.as_deref()) {
    return Ok(expand_tilde(path));
  }
  brewlog_store_sqlite::default_db_path().context("cannot determine default journal location")
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
