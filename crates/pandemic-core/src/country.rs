//! Country, the parent row every metrics record belongs to.

use serde::{Deserialize, Serialize};

/// A persisted `Countries` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub id_country: i64,
  pub name:       String,
  pub continent:  Option<String>,
  pub population: Option<i64>,
}

/// Country attributes as supplied by a caller; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewCountry {
  pub name:       String,
  pub continent:  Option<String>,
  pub population: Option<i64>,
}
