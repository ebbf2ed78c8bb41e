//! Error type for `pandemic-etl`. Every variant aborts the load.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("snapshot not found: {0}")]
  MissingSnapshot(PathBuf),

  #[error("snapshot {0} has no data rows")]
  EmptySnapshot(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("snapshot has no 'date' column")]
  MissingDateColumn,

  #[error("snapshot has no {0:?} column")]
  MissingColumn(&'static str),

  #[error("columns missing for PandemicData: {}", .0.join(", "))]
  MissingPandemicColumns(Vec<String>),

  #[error("line {line}: empty country name")]
  MissingCountryName { line: usize },

  #[error("line {line}, column {column}: {value:?} is not a number")]
  InvalidNumber {
    line:   usize,
    column: String,
    value:  String,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
