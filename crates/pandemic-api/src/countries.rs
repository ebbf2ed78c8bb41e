//! Handler for `GET /countries`.

use std::sync::Arc;

use axum::{Json, extract::State};
use pandemic_core::{country::Country, store::PandemicStore};

use crate::error::ApiError;

/// `GET /countries`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Country>>, ApiError>
where
  S: PandemicStore,
{
  let countries = store.list_countries().await.map_err(ApiError::store)?;
  Ok(Json(countries))
}
