//! Handlers for writing entries.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/add` | Body: [`NewEntry`]; returns 201 |
//! | `PUT`  | `/update/{id_country}/{date}` | Body: [`EntryPatch`]; partial update |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use pandemic_core::{
  patch::EntryPatch,
  record::{NewEntry, parse_date},
  store::{PandemicStore, UpdateOutcome},
};
use serde_json::json;

use crate::{
  error::ApiError,
  extract::{JsonBody, PathParams},
};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /add`: creates the country on first use, then the entry.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<NewEntry>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PandemicStore,
{
  let record = store.insert_entry(body).await.map_err(ApiError::store)?;
  tracing::info!(id = record.id, id_country = record.id_country, date = %record.date, "entry added");
  Ok((StatusCode::CREATED, Json(json!({ "message": "entry added" }))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /update/{id_country}/{date}`: fields absent from the body keep their
/// stored values.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  PathParams((id_country, date)): PathParams<(i64, String)>,
  body: Result<JsonBody<EntryPatch>, ApiError>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PandemicStore,
{
  // A bad date is reported ahead of a bad body.
  let date = parse_date(&date)?;
  let JsonBody(patch) = body?;

  match store
    .update_entry(id_country, date, patch)
    .await
    .map_err(ApiError::store)?
  {
    UpdateOutcome::Updated(_) => {
      tracing::info!(id_country, %date, "entry updated");
      Ok(Json(json!({ "message": "entry updated" })))
    }
    UpdateOutcome::CountryNotFound => {
      Err(ApiError::NotFound(format!("country {id_country} not found")))
    }
    UpdateOutcome::EntryNotFound => Err(ApiError::NotFound(format!(
      "no entry for country {id_country} on {date}"
    ))),
  }
}
