//! pandemic-etl binary.
//!
//! Loads the CSV snapshot into the SQLite store used by `pandemic-server`.
//! Exits non-zero on the first failed step.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use pandemic_etl::{LoaderConfig, load_snapshot};
use pandemic_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Load a pandemic CSV snapshot into the store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// CSV snapshot to load (default: data/df_finale.csv).
  #[arg(long)]
  snapshot: Option<PathBuf>,

  /// SQLite database to load into.
  #[arg(long)]
  database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = LoaderConfig::load(&cli.config).context("failed to read configuration")?;
  if let Some(snapshot) = cli.snapshot {
    cfg.snapshot_path = snapshot;
  }
  if let Some(database) = cli.database {
    cfg.database_path = database;
  }

  let store = SqliteStore::open(&cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.database_path))?;

  let report = load_snapshot(&store, &cfg.snapshot_path)
    .await
    .with_context(|| format!("failed to load {:?}", cfg.snapshot_path))?;

  tracing::info!(
    rows = report.snapshot_rows,
    countries = report.countries_upserted,
    appended = report.records_appended,
    unparsed_dates = report.unparsed_dates,
    "load complete"
  );
  Ok(())
}
