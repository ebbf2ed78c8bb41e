//! pandemic-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `PANDEMIC_*`
//! environment variables, opens the SQLite store (creating the schema if
//! needed) and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use pandemic_server::{ServerConfig, expand_tilde};
use pandemic_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Pandemic metrics API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the SQLite database path from the configuration.
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

  let mut server_cfg =
    ServerConfig::load(&cli.config).context("failed to read configuration")?;
  if let Some(database) = cli.database {
    server_cfg.database_path = database;
  }

  let database_path = expand_tilde(&server_cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;
  tracing::info!(path = ?database_path, "store ready");

  let app = pandemic_server::app(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
