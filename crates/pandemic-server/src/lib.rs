//! HTTP server for the pandemic metrics API.
//!
//! Wraps [`pandemic_api::api_router`] with the cross-origin and request
//! tracing layers the dashboards rely on.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use pandemic_core::store::PandemicStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PANDEMIC_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_database_path() -> PathBuf { PathBuf::from("pandemic.db") }

impl ServerConfig {
  /// Layer the optional TOML file at `path` under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PANDEMIC"))
      .build()?
      .try_deserialize()
  }

  /// `host:port` to bind.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: API routes, CORS and request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: PandemicStore + 'static,
{
  pandemic_api::api_router(store)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────
