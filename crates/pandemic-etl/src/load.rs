//! The load pipeline: snapshot → `Countries` upsert → id join → bulk append.

use std::{
  collections::{HashMap, HashSet},
  path::Path,
};

use pandemic_core::{
  country::{Country, NewCountry},
  record::NewRecord,
  store::PandemicStore,
};
use tracing::{info, warn};

use crate::{Error, Result, snapshot::Snapshot};

/// Counts describing a completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
  /// Data rows read from the snapshot.
  pub snapshot_rows:      usize,
  /// Distinct `(name, continent, population)` tuples upserted.
  pub countries_upserted: usize,
  /// Rows appended to `PandemicData`.
  pub records_appended:   usize,
  /// Rows whose date could not be parsed.
  pub unparsed_dates:     usize,
}

/// Distinct country tuples in first-seen order.
pub fn distinct_countries(rows: &[NewCountry]) -> Vec<NewCountry> {
  let mut seen = HashSet::new();
  rows
    .iter()
    .filter(|c| seen.insert(*c))
    .cloned()
    .collect()
}

/// The stored id of each row's country, matched on the exact name.
pub fn join_country_ids(rows: &[NewCountry], stored: &[Country]) -> Vec<Option<i64>> {
  let ids: HashMap<&str, i64> = stored
    .iter()
    .map(|c| (c.name.as_str(), c.id_country))
    .collect();
  rows
    .iter()
    .map(|c| ids.get(c.name.as_str()).copied())
    .collect()
}

fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

/// Run the whole load of the snapshot at `path` into `store`.
///
/// Every failure aborts the run. Country upserts are committed before the
/// pandemic columns are checked, so a snapshot rejected at that point still
/// leaves its countries behind.
pub async fn load_snapshot<S>(store: &S, path: &Path) -> Result<LoadReport>
where
  S: PandemicStore,
{
  let mut snapshot = Snapshot::read(path)?;
  info!(path = %path.display(), rows = snapshot.len(), "snapshot read");

  snapshot.normalize_date_column()?;
  let dates = snapshot.dates()?;
  let unparsed_dates = dates.iter().filter(|d| d.is_none()).count();
  if unparsed_dates > 0 {
    warn!(rows = unparsed_dates, "unparseable dates left empty");
  }

  let countries = snapshot.countries(snapshot.country_columns()?)?;
  let distinct = distinct_countries(&countries);
  let countries_upserted = store
    .upsert_countries(distinct)
    .await
    .map_err(store_err)?;
  info!(countries = countries_upserted, "countries upserted");

  let stored = store.list_countries().await.map_err(store_err)?;
  let ids = join_country_ids(&countries, &stored);
  let unmatched = ids.iter().filter(|id| id.is_none()).count();
  if unmatched > 0 {
    warn!(rows = unmatched, "rows without a matching country id");
  }

  let metrics = snapshot.metrics(snapshot.pandemic_columns()?)?;
  let records: Vec<NewRecord> = ids
    .into_iter()
    .zip(dates)
    .zip(metrics)
    .map(|((id_country, date), metrics)| NewRecord { id_country, date, metrics })
    .collect();

  let records_appended = store
    .append_records(records)
    .await
    .map_err(store_err)?;
  info!(rows = records_appended, "pandemic data appended");

  Ok(LoadReport {
    snapshot_rows: snapshot.len(),
    countries_upserted,
    records_appended,
    unparsed_dates,
  })
}
