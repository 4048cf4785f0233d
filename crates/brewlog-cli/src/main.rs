//! `brewlog`: command-line front-end for the coffee journal.
//!
//! # Usage
//!
//! ```text
//! brewlog bean add "Yirgacheffe" --roast light --rating 4.8 --price 650
//! brewlog session add 1 Pourover --temp 93 --time 180
//! brewlog stats
//! brewlog --db ~/coffee.db export backup.db
//! ```

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Context as _;
use brewlog_store_sqlite::SqliteStore;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "brewlog", author, version, about = "Coffee bean catalogue and brewing log")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "brewlog.toml")]
  config: PathBuf,

  /// Journal database file (overrides the config file and the default
  /// per-user location).
  #[arg(long, value_name = "FILE", env = "BREWLOG_DB_PATH")]
  db: Option<PathBuf>,

  /// Log at debug level unless `RUST_LOG` says otherwise.
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let settings = config::Settings::load(&cli.config)?;
  let db_path = config::resolve_db_path(cli.db.as_deref(), &settings)?;

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open journal at {}", db_path.display()))?;
  tracing::debug!(path = %db_path.display(), "journal ready");

  commands::run(store, cli.command).await
}
