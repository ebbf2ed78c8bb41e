//! Parsing of individual snapshot cells.
//!
//! Blank cells and the usual dataframe missing-value markers (`NaN`, `N/A`,
//! `NULL`, `#N/A`, ...) count as missing.

use chrono::NaiveDate;

/// Date layouts accepted in the `date` column, tried in order. The two-digit
/// year must come first: `%Y` would read `1/22/20` as year 20.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%y", "%m/%d/%Y"];

/// Placeholder stored for a country whose continent is missing.
pub const UNKNOWN_CONTINENT: &str = "Unknown";

/// Markers read as missing, besides a blank cell and any casing of `nan`.
/// Same set as the pandas CSV reader's defaults.
const MISSING_MARKERS: [&str; 16] = [
  "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
  "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "None", "n/a", "null",
];

/// `true` for a blank cell or a missing-value marker.
pub fn is_missing(cell: &str) -> bool {
  let cell = cell.trim();
  cell.is_empty() || cell.eq_ignore_ascii_case("nan") || MISSING_MARKERS.contains(&cell)
}

/// Parse a date cell. Anything after the date (a time of day) is ignored;
/// cells that match none of the known layouts yield `None`.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
  if is_missing(cell) {
    return None;
  }
  let day = cell
    .trim()
    .split(|c: char| c == ' ' || c == 'T')
    .next()
    .unwrap_or_default();
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

/// Parse an integer cell. Integral decimals (`"12.0"`) are accepted.
/// `Ok(None)` for a missing cell, `Err(())` for text that is not a whole
/// number.
pub fn parse_int(cell: &str) -> Result<Option<i64>, ()> {
  if is_missing(cell) {
    return Ok(None);
  }
  let cell = cell.trim();
  if let Ok(v) = cell.parse::<i64>() {
    return Ok(Some(v));
  }
  match cell.parse::<f64>() {
    Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
    _ => Err(()),
  }
}

/// Parse a population cell: missing becomes `0`, decimals are truncated.
pub fn parse_population(cell: &str) -> Result<i64, ()> {
  if is_missing(cell) {
    return Ok(0);
  }
  let cell = cell.trim();
  if let Ok(v) = cell.parse::<i64>() {
    return Ok(v);
  }
  match cell.parse::<f64>() {
    Ok(v) if v.is_finite() => Ok(v.trunc() as i64),
    _ => Err(()),
  }
}

/// The continent, or [`UNKNOWN_CONTINENT`] when missing.
pub fn fill_continent(cell: &str) -> String {
  if is_missing(cell) {
    UNKNOWN_CONTINENT.to_owned()
  } else {
    cell.to_owned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn dates_in_known_layouts() {
    assert_eq!(parse_date("2020-01-22"), Some(ymd(2020, 1, 22)));
    assert_eq!(parse_date("2020/01/22"), Some(ymd(2020, 1, 22)));
    assert_eq!(parse_date("1/22/2020"), Some(ymd(2020, 1, 22)));
    assert_eq!(parse_date("1/22/20"), Some(ymd(2020, 1, 22)));
    assert_eq!(parse_date("2020-01-22 00:00:00"), Some(ymd(2020, 1, 22)));
    assert_eq!(parse_date("2020-01-22T12:30:00"), Some(ymd(2020, 1, 22)));
  }

  #[test]
  fn unparseable_dates_become_none() {
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("NaN"), None);
    assert_eq!(parse_date("someday"), None);
    assert_eq!(parse_date("2020-02-30"), None);
  }

  #[test]
  fn integers() {
    assert_eq!(parse_int("42"), Ok(Some(42)));
    assert_eq!(parse_int(" 42 "), Ok(Some(42)));
    assert_eq!(parse_int("42.0"), Ok(Some(42)));
    assert_eq!(parse_int(""), Ok(None));
    assert_eq!(parse_int("nan"), Ok(None));
    for marker in ["N/A", "NA", "NULL", "null", "#N/A", "None", "-nan", "<NA>"] {
      assert_eq!(parse_int(marker), Ok(None), "{marker}");
    }
    assert_eq!(parse_int("4.5"), Err(()));
    assert_eq!(parse_int("many"), Err(()));
  }

  #[test]
  fn population_defaults_to_zero_and_truncates() {
    assert_eq!(parse_population(""), Ok(0));
    assert_eq!(parse_population("NaN"), Ok(0));
    assert_eq!(parse_population("NA"), Ok(0));
    assert_eq!(parse_population("67000000"), Ok(67_000_000));
    assert_eq!(parse_population("1234.9"), Ok(1234));
    assert_eq!(parse_population("lots"), Err(()));
  }

  #[test]
  fn continent_placeholder() {
    assert_eq!(fill_continent(""), "Unknown");
    assert_eq!(fill_continent("N/A"), "Unknown");
    assert_eq!(fill_continent("NULL"), "Unknown");
    assert_eq!(fill_continent("Europe"), "Europe");
  }
}
