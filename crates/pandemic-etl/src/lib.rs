//! Batch loader that imports a CSV snapshot into a pandemic metrics store.
//!
//! The run is all-or-nothing per step and never retries: distinct countries
//! are upserted by name, their ids are read back and joined onto the
//! snapshot rows by name, and every row is appended to `PandemicData`
//! without deduplication.

mod cells;
mod load;

pub mod error;
pub mod snapshot;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use error::{Error, Result};
pub use load::{LoadReport, distinct_countries, join_country_ids, load_snapshot};


/// Loader configuration, deserialised from an optional TOML file and
/// `PANDEMIC_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct LoaderConfig {
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  #[serde(default = "default_snapshot_path")]
  pub snapshot_path: PathBuf,
}

fn default_database_path() -> PathBuf { PathBuf::from("pandemic.db") }

fn default_snapshot_path() -> PathBuf { PathBuf::from("data/df_finale.csv") }

impl LoaderConfig {
  /// Layer the optional TOML file at `path` under the environment.
  pub fn load(path: &Path) -> std::result::Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PANDEMIC"))
      .build()?
      .try_deserialize()
  }
}
