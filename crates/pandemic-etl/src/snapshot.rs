//! The CSV snapshot: reading, column lookup and per-row extraction.

use std::{fs::File, io::ErrorKind, path::Path};

use chrono::NaiveDate;
use csv::StringRecord;
use pandemic_core::{country::NewCountry, record::Metrics};

use crate::{
  Error, Result,
  cells::{fill_continent, parse_date, parse_int, parse_population},
};

pub const DATE_COLUMN: &str = "date";
pub const COUNTRY_COLUMN: &str = "Country_Region";
pub const CONTINENT_COLUMN: &str = "continent";
pub const POPULATION_COLUMN: &str = "population";

/// Snapshot headers feeding `PandemicData`, in [`Metrics`] field order.
pub const PANDEMIC_COLUMNS: [&str; 13] = [
  "Deaths",
  "Recovered",
  "total_cases",
  "total_deaths",
  "total_recovered",
  "total_tests",
  "New_cases",
  "New_deaths",
  "New_recovered",
  "active_cases",
  "Serious_Critical",
  "TrueConfirmed",
  "Active",
];

/// A fully-read snapshot. Rows keep their raw text until a step needs them.
#[derive(Debug, Clone)]
pub struct Snapshot {
  headers: Vec<String>,
  rows:    Vec<StringRecord>,
}

/// Positions of the country attribute columns.
#[derive(Debug, Clone, Copy)]
pub struct CountryColumns {
  name:       usize,
  continent:  usize,
  population: usize,
}

/// Positions of [`PANDEMIC_COLUMNS`].
#[derive(Debug, Clone, Copy)]
pub struct PandemicColumns([usize; 13]);

impl Snapshot {
  /// Read the whole file. Fails if it does not exist or holds no data rows.
  pub fn read(path: &Path) -> Result<Self> {
    let file = File::open(path).map_err(|e| match e.kind() {
      ErrorKind::NotFound => Error::MissingSnapshot(path.to_path_buf()),
      _ => Error::Io(e),
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.iter().map(str::to_owned).collect();
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    if rows.is_empty() {
      return Err(Error::EmptySnapshot(path.to_path_buf()));
    }
    Ok(Self { headers, rows })
  }

  #[cfg(test)]
  fn from_parts(headers: Vec<String>, rows: Vec<StringRecord>) -> Self {
    Self { headers, rows }
  }

  /// Number of data rows.
  pub(crate) fn len(&self) -> usize { self.rows.len() }

  fn column(&self, name: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == name)
  }

  fn require(&self, name: &'static str) -> Result<usize> {
    self.column(name).ok_or(Error::MissingColumn(name))
  }

  /// Rename a `Date` column to `date`, then check a `date` column exists.
  pub fn normalize_date_column(&mut self) -> Result<()> {
    if let Some(header) = self.headers.iter_mut().find(|h| h.as_str() == "Date") {
      *header = DATE_COLUMN.to_owned();
    }
    self.column(DATE_COLUMN).map(|_| ()).ok_or(Error::MissingDateColumn)
  }

  /// The parsed date of every row; unparseable cells become `None`.
  pub fn dates(&self) -> Result<Vec<Option<NaiveDate>>> {
    let at = self.column(DATE_COLUMN).ok_or(Error::MissingDateColumn)?;
    Ok(
      self
        .rows
        .iter()
        .map(|row| parse_date(row.get(at).unwrap_or_default()))
        .collect(),
    )
  }

  pub fn country_columns(&self) -> Result<CountryColumns> {
    Ok(CountryColumns {
      name:       self.require(COUNTRY_COLUMN)?,
      continent:  self.require(CONTINENT_COLUMN)?,
      population: self.require(POPULATION_COLUMN)?,
    })
  }

  /// The country of every row, with continent and population filled in.
  pub fn countries(&self, cols: CountryColumns) -> Result<Vec<NewCountry>> {
    self
      .rows
      .iter()
      .enumerate()
      .map(|(i, row)| {
        let line = line_number(i);
        let cell = |at: usize| row.get(at).unwrap_or_default();

        let name = cell(cols.name);
        if name.trim().is_empty() {
          return Err(Error::MissingCountryName { line });
        }
        let population = parse_population(cell(cols.population)).map_err(|()| {
          Error::InvalidNumber {
            line,
            column: POPULATION_COLUMN.to_owned(),
            value: cell(cols.population).to_owned(),
          }
        })?;

        Ok(NewCountry {
          name:       name.to_owned(),
          continent:  Some(fill_continent(cell(cols.continent))),
          population: Some(population),
        })
      })
      .collect()
  }

  /// Locate every [`PANDEMIC_COLUMNS`] header, reporting all that are absent.
  pub fn pandemic_columns(&self) -> Result<PandemicColumns> {
    let found: Vec<Option<usize>> =
      PANDEMIC_COLUMNS.iter().map(|name| self.column(name)).collect();

    let missing: Vec<String> = PANDEMIC_COLUMNS
      .iter()
      .zip(&found)
      .filter(|(_, at)| at.is_none())
      .map(|(name, _)| (*name).to_owned())
      .collect();
    if !missing.is_empty() {
      return Err(Error::MissingPandemicColumns(missing));
    }

    let mut positions = [0; 13];
    for (slot, at) in positions.iter_mut().zip(found.into_iter().flatten()) {
      *slot = at;
    }
    Ok(PandemicColumns(positions))
  }

  /// The metric values of every row.
  pub fn metrics(&self, cols: PandemicColumns) -> Result<Vec<Metrics>> {
    self
      .rows
      .iter()
      .enumerate()
      .map(|(i, row)| {
        let mut values = [None; 13];
        for ((value, at), name) in values.iter_mut().zip(cols.0).zip(PANDEMIC_COLUMNS) {
          let cell = row.get(at).unwrap_or_default();
          *value = parse_int(cell).map_err(|()| Error::InvalidNumber {
            line:   line_number(i),
            column: name.to_owned(),
            value:  cell.to_owned(),
          })?;
        }
        let [
          deaths,
          recovered,
          total_cases,
          total_deaths,
          total_recovered,
          total_tests,
          new_cases,
          new_deaths,
          new_recovered,
          active_cases,
          serious_critical,
          true_confirmed,
          active,
        ] = values;
        Ok(Metrics {
          deaths,
          recovered,
          total_cases,
          total_deaths,
          total_recovered,
          total_tests,
          new_cases,
          new_deaths,
          new_recovered,
          active_cases,
          serious_critical,
          true_confirmed,
          active,
        })
      })
      .collect()
  }
}

/// Line in the file of data row `index` (the header is line 1).
fn line_number(index: usize) -> usize { index + 2 }
