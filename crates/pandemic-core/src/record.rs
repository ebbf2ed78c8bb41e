//! Daily pandemic metrics: one row per country per date.
//!
//! Column names follow the snapshot the data was first loaded from, which is
//! why some fields serialise with capitalised keys (`Deaths`,
//! `New_recovered`, `TrueConfirmed`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Wire and storage format of every date in the system.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date, as used in request paths.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

/// The metric columns of a `PandemicData` row. Every value is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
  #[serde(rename = "Deaths", default)]
  pub deaths:           Option<i64>,
  #[serde(rename = "Recovered", default)]
  pub recovered:        Option<i64>,
  #[serde(default)]
  pub total_cases:      Option<i64>,
  #[serde(default)]
  pub total_deaths:     Option<i64>,
  #[serde(default)]
  pub total_recovered:  Option<i64>,
  #[serde(default)]
  pub total_tests:      Option<i64>,
  #[serde(default)]
  pub new_cases:        Option<i64>,
  #[serde(default)]
  pub new_deaths:       Option<i64>,
  #[serde(rename = "New_recovered", default)]
  pub new_recovered:    Option<i64>,
  #[serde(default)]
  pub active_cases:     Option<i64>,
  #[serde(default)]
  pub serious_critical: Option<i64>,
  #[serde(rename = "TrueConfirmed", default)]
  pub true_confirmed:   Option<i64>,
  #[serde(rename = "Active", default)]
  pub active:           Option<i64>,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted `PandemicData` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PandemicRecord {
  pub id:         i64,
  pub date:       NaiveDate,
  pub id_country: i64,
  #[serde(flatten)]
  pub metrics:    Metrics,
}

/// The projection returned by the time-series endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRow {
  pub date:             NaiveDate,
  pub id_country:       i64,
  pub total_cases:      Option<i64>,
  pub new_cases:        Option<i64>,
  pub total_deaths:     Option<i64>,
  pub new_deaths:       Option<i64>,
  pub total_recovered:  Option<i64>,
  pub active_cases:     Option<i64>,
  pub serious_critical: Option<i64>,
  #[serde(rename = "TrueConfirmed")]
  pub true_confirmed:   Option<i64>,
  #[serde(rename = "New_recovered")]
  pub new_recovered:    Option<i64>,
}

impl From<PandemicRecord> for SeriesRow {
  fn from(r: PandemicRecord) -> Self {
    SeriesRow {
      date:             r.date,
      id_country:       r.id_country,
      total_cases:      r.metrics.total_cases,
      new_cases:        r.metrics.new_cases,
      total_deaths:     r.metrics.total_deaths,
      new_deaths:       r.metrics.new_deaths,
      total_recovered:  r.metrics.total_recovered,
      active_cases:     r.metrics.active_cases,
      serious_critical: r.metrics.serious_critical,
      true_confirmed:   r.metrics.true_confirmed,
      new_recovered:    r.metrics.new_recovered,
    }
  }
}

/// Input to [`PandemicStore::insert_entry`](crate::store::PandemicStore::insert_entry).
///
/// The country is referenced by name and created on first use; `continent`
/// and `population` only matter when that happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
  pub country:          String,
  #[serde(default)]
  pub continent:        Option<String>,
  #[serde(default)]
  pub population:       Option<i64>,
  pub date:             NaiveDate,
  #[serde(default)]
  pub total_cases:      Option<i64>,
  #[serde(default)]
  pub total_deaths:     Option<i64>,
  #[serde(default)]
  pub new_cases:        Option<i64>,
  #[serde(default)]
  pub new_deaths:       Option<i64>,
  #[serde(default)]
  pub total_recovered:  Option<i64>,
  #[serde(default)]
  pub active_cases:     Option<i64>,
  #[serde(default)]
  pub serious_critical: Option<i64>,
  #[serde(rename = "TrueConfirmed", default)]
  pub true_confirmed:   Option<i64>,
}

impl NewEntry {
  /// The metric columns carried by the entry; all others stay `NULL`.
  pub fn metrics(&self) -> Metrics {
    Metrics {
      total_cases: self.total_cases,
      total_deaths: self.total_deaths,
      new_cases: self.new_cases,
      new_deaths: self.new_deaths,
      total_recovered: self.total_recovered,
      active_cases: self.active_cases,
      serious_critical: self.serious_critical,
      true_confirmed: self.true_confirmed,
      ..Metrics::default()
    }
  }
}

/// A row appended in bulk by the snapshot loader.
///
/// `id_country` and `date` are optional because the loader hands join misses
/// and unparseable dates to the store as-is; the `NOT NULL` constraints
/// reject them there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
  pub id_country: Option<i64>,
  pub date:       Option<NaiveDate>,
  pub metrics:    Metrics,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_date_accepts_iso() {
    let d = parse_date("2020-03-15").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
  }

  #[test]
  fn parse_date_rejects_other_shapes() {
    assert!(parse_date("15/03/2020").is_err());
    assert!(parse_date("2020-13-01").is_err());
    assert!(parse_date("").is_err());
  }

  #[test]
  fn series_row_uses_source_column_names() {
    let record = PandemicRecord {
      id:         1,
      date:       NaiveDate::from_ymd_opt(2020, 1, 22).unwrap(),
      id_country: 7,
      metrics:    Metrics {
        true_confirmed: Some(3),
        new_recovered: Some(1),
        ..Metrics::default()
      },
    };
    let json = serde_json::to_value(SeriesRow::from(record)).unwrap();
    assert_eq!(json["date"], "2020-01-22");
    assert_eq!(json["TrueConfirmed"], 3);
    assert_eq!(json["New_recovered"], 1);
    assert!(json["total_cases"].is_null());
  }

  #[test]
  fn new_entry_metrics_leave_unlisted_columns_empty() {
    let entry: NewEntry = serde_json::from_value(serde_json::json!({
      "country": "France",
      "date": "2020-04-01",
      "total_cases": 10,
      "TrueConfirmed": 12,
    }))
    .unwrap();
    let m = entry.metrics();
    assert_eq!(m.total_cases, Some(10));
    assert_eq!(m.true_confirmed, Some(12));
    assert_eq!(m.deaths, None);
    assert_eq!(m.active, None);
  }
}
