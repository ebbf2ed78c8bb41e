//! Async HTTP client wrapping the pandemic JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use pandemic_core::{country::Country, record::{DATE_FORMAT, SeriesRow}};
use reqwest::Client;

/// Connection settings for the pandemic API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the pandemic JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── Countries ─────────────────────────────────────────────────────────────

  /// `GET /countries`
  pub async fn list_countries(&self) -> Result<Vec<Country>> {
    let resp = self
      .client
      .get(self.url("/countries"))
      .send()
      .await
      .context("GET /countries failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /countries → {}", resp.status()));
    }
    resp.json().await.context("deserialising countries")
  }

  // ── Series ────────────────────────────────────────────────────────────────

  /// `GET /data?id_country=<id>`
  pub async fn get_series(&self, id_country: i64) -> Result<Vec<SeriesRow>> {
    let resp = self
      .client
      .get(self.url("/data"))
      .query(&[("id_country", id_country.to_string())])
      .send()
      .await
      .context("GET /data failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /data → {}", resp.status()));
    }
    resp.json().await.context("deserialising series")
  }

  /// `DELETE /data/<id>/<date>`
  ///
  /// Returns `false` when the server had no such row.
  pub async fn delete_entry(&self, id_country: i64, date: NaiveDate) -> Result<bool> {
    let path = format!("/data/{id_country}/{}", date.format(DATE_FORMAT));
    let resp = self
      .client
      .delete(self.url(&path))
      .send()
      .await
      .with_context(|| format!("DELETE {path} failed"))?;

    match resp.status() {
      s if s.is_success() => Ok(true),
      reqwest::StatusCode::NOT_FOUND => Ok(false),
      s => Err(anyhow!("DELETE {path} → {s}")),
    }
  }
}
