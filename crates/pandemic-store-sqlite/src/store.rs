//! [`SqliteStore`], the SQLite implementation of [`PandemicStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{OptionalExtension as _, ToSql};
use tracing::debug;

use pandemic_core::{
  country::{Country, NewCountry},
  patch::EntryPatch,
  record::{NewEntry, NewRecord, PandemicRecord, SeriesRow},
  store::{PandemicStore, UpdateOutcome},
};

use crate::{
  Result,
  encode::{
    METRIC_COLUMNS, METRIC_COUNT, RECORD_COLUMNS, metric_params, read_country,
    read_record, read_series_row,
  },
  schema::SCHEMA,
};

/// `INSERT` for one `PandemicData` row: date, id_country, then the metrics.
fn insert_record_sql() -> String {
  let placeholders = vec!["?"; METRIC_COUNT + 2].join(", ");
  format!(
    "INSERT INTO PandemicData (date, id_country, {METRIC_COLUMNS}) VALUES ({placeholders})"
  )
}

/// First row for a `(id_country, date)` key.
fn select_entry_sql() -> String {
  format!(
    "SELECT {RECORD_COLUMNS} FROM PandemicData
     WHERE id_country = ?1 AND date = ?2
     ORDER BY id
     LIMIT 1"
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A pandemic metrics store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, as the tests do.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The first row for `(id_country, date)`, with every metric column.
  #[cfg(test)]
  pub(crate) async fn get_entry(
    &self,
    id_country: i64,
    date:       NaiveDate,
  ) -> Result<Option<PandemicRecord>> {
    let record = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &select_entry_sql(),
              rusqlite::params![id_country, date],
              read_record,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(record)
  }
}

// ─── PandemicStore impl ──────────────────────────────────────────────────────

impl PandemicStore for SqliteStore {
  type Error = crate::Error;

  // ── Countries ─────────────────────────────────────────────────────────────

  async fn list_countries(&self) -> Result<Vec<Country>> {
    let countries = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id_country, name, continent, population
           FROM Countries
           ORDER BY id_country",
        )?;
        let rows = stmt
          .query_map([], read_country)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(countries)
  }

  async fn upsert_countries(&self, countries: Vec<NewCountry>) -> Result<usize> {
    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO Countries (name, continent, population)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
               continent  = excluded.continent,
               population = excluded.population",
          )?;
          for c in &countries {
            stmt.execute(rusqlite::params![c.name, c.continent, c.population])?;
          }
        }
        tx.commit()?;
        Ok(countries.len())
      })
      .await?;
    Ok(count)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_series(&self, id_country: i64) -> Result<Vec<SeriesRow>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             p.date, p.id_country, p.total_cases, p.new_cases,
             p.total_deaths, p.new_deaths, p.total_recovered,
             p.active_cases, p.serious_critical, p.TrueConfirmed,
             p.New_recovered
           FROM PandemicData p
           JOIN Countries c ON c.id_country = p.id_country
           WHERE p.id_country = ?1
           ORDER BY p.date, p.id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_country], read_series_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_entry(&self, entry: NewEntry) -> Result<PandemicRecord> {
    let metrics = entry.metrics();

    let record = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Conditional insert against UNIQUE(name): a concurrent creator of
        // the same country makes this a no-op instead of a duplicate.
        let created = tx.execute(
          "INSERT INTO Countries (name, continent, population)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(name) DO NOTHING",
          rusqlite::params![entry.country, entry.continent, entry.population],
        )?;
        let id_country: i64 = tx.query_row(
          "SELECT id_country FROM Countries WHERE name = ?1",
          rusqlite::params![entry.country],
          |row| row.get(0),
        )?;
        if created > 0 {
          debug!(id_country, name = %entry.country, "created country");
        }

        let mut params: Vec<&dyn ToSql> = vec![&entry.date, &id_country];
        params.extend(metric_params(&metrics));
        tx.execute(&insert_record_sql(), params.as_slice())?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(PandemicRecord { id, date: entry.date, id_country, metrics })
      })
      .await?;
    Ok(record)
  }

  async fn update_entry(
    &self,
    id_country: i64,
    date:       NaiveDate,
    patch:      EntryPatch,
  ) -> Result<UpdateOutcome> {
    let outcome = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls back.
        let tx = conn.transaction()?;

        let country_exists = tx
          .query_row(
            "SELECT 1 FROM Countries WHERE id_country = ?1",
            rusqlite::params![id_country],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !country_exists {
          return Ok(UpdateOutcome::CountryNotFound);
        }

        let Some(existing) = tx
          .query_row(
            &select_entry_sql(),
            rusqlite::params![id_country, date],
            read_record,
          )
          .optional()?
        else {
          return Ok(UpdateOutcome::EntryNotFound);
        };
        debug!(?existing, "entry found");

        if patch.is_empty() {
          debug!("patch carries no updatable field, nothing written");
          return Ok(UpdateOutcome::Updated(existing));
        }

        let merged = patch.apply(&existing.metrics);
        tx.execute(
          "UPDATE PandemicData SET
             total_cases   = ?1,
             total_deaths  = ?2,
             new_cases     = ?3,
             new_deaths    = ?4,
             New_recovered = ?5
           WHERE id = ?6",
          rusqlite::params![
            merged.total_cases,
            merged.total_deaths,
            merged.new_cases,
            merged.new_deaths,
            merged.new_recovered,
            existing.id,
          ],
        )?;
        tx.commit()?;

        let updated = PandemicRecord { metrics: merged, ..existing };
        debug!(?updated, "entry updated");
        Ok(UpdateOutcome::Updated(updated))
      })
      .await?;
    Ok(outcome)
  }

  async fn delete_entry(&self, id_country: i64, date: NaiveDate) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM PandemicData
           WHERE id = (
             SELECT id FROM PandemicData
             WHERE id_country = ?1 AND date = ?2
             ORDER BY id
             LIMIT 1
           )",
          rusqlite::params![id_country, date],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn append_records(&self, records: Vec<NewRecord>) -> Result<usize> {
    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(&insert_record_sql())?;
          for r in &records {
            let mut params: Vec<&dyn ToSql> = vec![&r.date, &r.id_country];
            params.extend(metric_params(&r.metrics));
            stmt.execute(params.as_slice())?;
          }
        }
        tx.commit()?;
        Ok(records.len())
      })
      .await?;
    Ok(count)
  }
}
