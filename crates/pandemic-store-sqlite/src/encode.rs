//! Mapping between domain types and SQLite rows.
//!
//! Dates are stored as `YYYY-MM-DD` text through rusqlite's `chrono`
//! support. Metric columns are always read and written in the order of
//! [`METRIC_COLUMNS`].

use pandemic_core::{
  country::Country,
  record::{Metrics, PandemicRecord, SeriesRow},
};
use rusqlite::{Row, ToSql};

// ─── Column lists ─────────────────────────────────────────────────────────────

/// Metric columns of `PandemicData`, in [`Metrics`] field order.
pub const METRIC_COLUMNS: &str = "Deaths, Recovered, total_cases, total_deaths, \
   total_recovered, total_tests, new_cases, new_deaths, New_recovered, \
   active_cases, serious_critical, TrueConfirmed, Active";

/// Every column of a `PandemicData` row, as read by [`read_record`].
pub const RECORD_COLUMNS: &str = "id, date, id_country, Deaths, Recovered, \
   total_cases, total_deaths, total_recovered, total_tests, new_cases, \
   new_deaths, New_recovered, active_cases, serious_critical, TrueConfirmed, \
   Active";

/// Number of entries in [`METRIC_COLUMNS`].
pub const METRIC_COUNT: usize = 13;

// ─── Metrics ──────────────────────────────────────────────────────────────────

/// Metric values as SQL parameters, in [`METRIC_COLUMNS`] order.
pub fn metric_params(m: &Metrics) -> [&dyn ToSql; METRIC_COUNT] {
  [
    &m.deaths,
    &m.recovered,
    &m.total_cases,
    &m.total_deaths,
    &m.total_recovered,
    &m.total_tests,
    &m.new_cases,
    &m.new_deaths,
    &m.new_recovered,
    &m.active_cases,
    &m.serious_critical,
    &m.true_confirmed,
    &m.active,
  ]
}

/// Read the metric columns starting at column index `at`.
fn read_metrics(row: &Row<'_>, at: usize) -> rusqlite::Result<Metrics> {
  Ok(Metrics {
    deaths:           row.get(at)?,
    recovered:        row.get(at + 1)?,
    total_cases:      row.get(at + 2)?,
    total_deaths:     row.get(at + 3)?,
    total_recovered:  row.get(at + 4)?,
    total_tests:      row.get(at + 5)?,
    new_cases:        row.get(at + 6)?,
    new_deaths:       row.get(at + 7)?,
    new_recovered:    row.get(at + 8)?,
    active_cases:     row.get(at + 9)?,
    serious_critical: row.get(at + 10)?,
    true_confirmed:   row.get(at + 11)?,
    active:           row.get(at + 12)?,
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Read a row selected with [`RECORD_COLUMNS`].
pub fn read_record(row: &Row<'_>) -> rusqlite::Result<PandemicRecord> {
  Ok(PandemicRecord {
    id:         row.get(0)?,
    date:       row.get(1)?,
    id_country: row.get(2)?,
    metrics:    read_metrics(row, 3)?,
  })
}

/// Read a `Countries` row selected as `id_country, name, continent, population`.
pub fn read_country(row: &Row<'_>) -> rusqlite::Result<Country> {
  Ok(Country {
    id_country: row.get(0)?,
    name:       row.get(1)?,
    continent:  row.get(2)?,
    population: row.get(3)?,
  })
}

/// Read a row selected with the column order of [`SeriesRow`].
pub fn read_series_row(row: &Row<'_>) -> rusqlite::Result<SeriesRow> {
  Ok(SeriesRow {
    date:             row.get(0)?,
    id_country:       row.get(1)?,
    total_cases:      row.get(2)?,
    new_cases:        row.get(3)?,
    total_deaths:     row.get(4)?,
    new_deaths:       row.get(5)?,
    total_recovered:  row.get(6)?,
    active_cases:     row.get(7)?,
    serious_critical: row.get(8)?,
    true_confirmed:   row.get(9)?,
    new_recovered:    row.get(10)?,
  })
}
