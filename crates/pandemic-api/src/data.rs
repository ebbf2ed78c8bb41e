//! Handlers for `/data` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/data` | `?id_country` required |
//! | `DELETE` | `/data/{id_country}/{date}` | 404 if no row matches |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use pandemic_core::{
  record::{SeriesRow, parse_date},
  store::PandemicStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{error::ApiError, extract::PathParams};

// ─── Series ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SeriesParams {
  /// Kept as text so that an empty or non-numeric value is reported as
  /// missing rather than as an extractor rejection.
  pub id_country: Option<String>,
}

impl SeriesParams {
  /// The requested country, if the parameter holds a non-zero integer.
  fn country_id(&self) -> Option<i64> {
    self
      .id_country
      .as_deref()
      .and_then(|s| s.trim().parse::<i64>().ok())
      .filter(|id| *id != 0)
  }
}

/// `GET /data?id_country=<id>`
pub async fn series<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SeriesParams>,
) -> Result<Json<Vec<SeriesRow>>, ApiError>
where
  S: PandemicStore,
{
  let id_country = params
    .country_id()
    .ok_or_else(|| ApiError::BadRequest("id_country is required".into()))?;

  let rows = store.get_series(id_country).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /data/{id_country}/{date}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  PathParams((id_country, date)): PathParams<(i64, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: PandemicStore,
{
  let date = parse_date(&date)?;

  let deleted = store
    .delete_entry(id_country, date)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!(
      "no entry for country {id_country} on {date}"
    )));
  }

  tracing::info!(id_country, %date, "entry deleted");
  Ok(Json(json!({ "message": "entry deleted" })))
}
