//! The `PandemicStore` trait, the repository interface every layer above the
//! database talks to.
//!
//! The trait is implemented by storage backends (e.g.
//! `pandemic-store-sqlite`). The HTTP API and the snapshot loader receive a
//! store explicitly and never reach for a global handle.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  country::{Country, NewCountry},
  patch::EntryPatch,
  record::{NewEntry, NewRecord, PandemicRecord, SeriesRow},
};

/// Result of [`PandemicStore::update_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
  /// The row after the patch was applied and committed.
  Updated(PandemicRecord),
  CountryNotFound,
  EntryNotFound,
}

/// Abstraction over a pandemic metrics store backend.
///
/// When several rows share a `(id_country, date)` key, the keyed operations
/// act on the one inserted first.
pub trait PandemicStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Countries ─────────────────────────────────────────────────────────

  /// All countries, ordered by id.
  fn list_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  /// Insert-or-overwrite each country by name, in order, in one transaction.
  /// A later entry for the same name wins. Returns the number of statements
  /// executed.
  fn upsert_countries(
    &self,
    countries: Vec<NewCountry>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Pandemic data — reads ─────────────────────────────────────────────

  /// The time series for one country, ordered by date. Empty if the
  /// country is unknown or has no rows.
  fn get_series(
    &self,
    id_country: i64,
  ) -> impl Future<Output = Result<Vec<SeriesRow>, Self::Error>> + Send + '_;

  // ── Pandemic data — writes ────────────────────────────────────────────

  /// Get-or-create the entry's country by name, then insert a new row for
  /// it. An existing country's continent and population are left as they
  /// are.
  fn insert_entry(
    &self,
    entry: NewEntry,
  ) -> impl Future<Output = Result<PandemicRecord, Self::Error>> + Send + '_;

  /// Merge `patch` into the row for `(id_country, date)` and persist it.
  /// Nothing is written unless the outcome is [`UpdateOutcome::Updated`].
  fn update_entry(
    &self,
    id_country: i64,
    date: NaiveDate,
    patch: EntryPatch,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Delete the row for `(id_country, date)`. Returns `false` if none
  /// matched.
  fn delete_entry(
    &self,
    id_country: i64,
    date: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Plain insert of every record in one transaction; no deduplication. If
  /// any row is rejected nothing is kept. Returns the number of rows
  /// inserted.
  fn append_records(
    &self,
    records: Vec<NewRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
