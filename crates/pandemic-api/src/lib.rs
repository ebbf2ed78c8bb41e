//! JSON REST API over a pandemic metrics store.
//!
//! Exposes an axum [`Router`] backed by any
//! [`pandemic_core::store::PandemicStore`]. CORS, tracing and transport
//! concerns are the caller's responsibility.
//!
//! | Method   | Path | Handler |
//! |----------|------|---------|
//! | `GET`    | `/countries` | [`countries::list`] |
//! | `GET`    | `/data?id_country=N` | [`data::series`] |
//! | `POST`   | `/add` | [`entries::create`] |
//! | `PUT`    | `/update/{id_country}/{date}` | [`entries::update_one`] |
//! | `DELETE` | `/data/{id_country}/{date}` | [`data::delete_one`] |
//! | `GET`    | `/openapi.json` | [`docs::openapi`] |

pub mod countries;
pub mod data;
pub mod docs;
pub mod entries;
pub mod error;
pub mod extract;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use pandemic_core::store::PandemicStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested or layered by the caller
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PandemicStore + 'static,
{
  Router::new()
    .route("/countries", get(countries::list::<S>))
    .route("/data", get(data::series::<S>))
    .route("/data/{id_country}/{date}", delete(data::delete_one::<S>))
    .route("/add", post(entries::create::<S>))
    .route("/update/{id_country}/{date}", put(entries::update_one::<S>))
    .route("/openapi.json", get(docs::openapi))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use std::future::Future;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::NaiveDate;
  use pandemic_core::{
    country::{Country, NewCountry},
    patch::EntryPatch,
    record::{NewEntry, NewRecord, PandemicRecord, SeriesRow},
    store::UpdateOutcome,
  };
  use pandemic_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send<S>(
    store:  &Arc<S>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value)
  where
    S: PandemicStore + 'static,
  {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(store.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json   = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  fn add_body(country: &str, continent: &str, population: i64, date: &str) -> Value {
    json!({
      "country": country,
      "continent": continent,
      "population": population,
      "date": date,
      "total_cases": 100,
      "total_deaths": 5,
      "new_cases": 10,
      "new_deaths": 1,
      "total_recovered": 20,
      "active_cases": 75,
      "serious_critical": 3,
      "TrueConfirmed": 110,
    })
  }

  async fn first_country_id(store: &Arc<SqliteStore>) -> i64 {
    let (_, countries) = send(store, "GET", "/countries", None).await;
    countries[0]["id_country"].as_i64().unwrap()
  }

  // ── Countries ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn countries_starts_empty() {
    let store = make_store().await;
    let (status, body) = send(&store, "GET", "/countries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn add_creates_country_once_and_keeps_first_attributes() {
    let store = make_store().await;

    let (status, body) =
      send(&store, "POST", "/add", Some(add_body("France", "Europe", 67, "2020-04-01"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].is_string());

    let (status, _) =
      send(&store, "POST", "/add", Some(add_body("France", "Mars", 1, "2020-04-02"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, countries) = send(&store, "GET", "/countries", None).await;
    let countries = countries.as_array().unwrap();
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0]["name"], "France");
    assert_eq!(countries[0]["continent"], "Europe");
    assert_eq!(countries[0]["population"], 67);
  }

  #[tokio::test]
  async fn add_without_country_is_rejected() {
    let store = make_store().await;
    let (status, body) =
      send(&store, "POST", "/add", Some(json!({ "date": "2020-04-01" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
    assert!(store.list_countries().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn add_with_bad_date_is_rejected_as_json() {
    let store = make_store().await;
    let (status, body) = send(
      &store,
      "POST",
      "/add",
      Some(json!({ "country": "Peru", "date": "bad" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
  }

  // ── Series ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn data_without_id_returns_400() {
    let store = make_store().await;
    for uri in ["/data", "/data?id_country=", "/data?id_country=abc", "/data?id_country=0"] {
      let (status, body) = send(&store, "GET", uri, None).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
      assert!(body["error"].is_string(), "{uri}: {body}");
    }
  }

  #[tokio::test]
  async fn data_for_country_without_rows_is_empty() {
    let store = make_store().await;
    let (status, body) = send(&store, "GET", "/data?id_country=42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn data_returns_projected_rows() {
    let store = make_store().await;
    send(&store, "POST", "/add", Some(add_body("Chile", "South America", 19, "2020-04-01"))).await;
    let id = first_country_id(&store).await;

    let (status, body) = send(&store, "GET", &format!("/data?id_country={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let row = &body[0];
    assert_eq!(row["date"], "2020-04-01");
    assert_eq!(row["id_country"], id);
    assert_eq!(row["total_cases"], 100);
    assert_eq!(row["TrueConfirmed"], 110);
    assert!(row.get("New_recovered").is_some());
    assert!(row.get("Deaths").is_none());
  }

  // ── Update ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_changes_only_supplied_fields() {
    let store = make_store().await;
    send(&store, "POST", "/add", Some(add_body("Japan", "Asia", 125, "2020-04-05"))).await;
    let id = first_country_id(&store).await;

    let (status, body) = send(
      &store,
      "PUT",
      &format!("/update/{id}/2020-04-05"),
      Some(json!({ "new_cases": 42, "active_cases": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, series) = send(&store, "GET", &format!("/data?id_country={id}"), None).await;
    let row = &series[0];
    assert_eq!(row["new_cases"], 42);
    assert_eq!(row["total_cases"], 100);
    assert_eq!(row["total_deaths"], 5);
    assert_eq!(row["new_deaths"], 1);
    // Not an updatable field: left alone.
    assert_eq!(row["active_cases"], 75);

    assert_eq!(row["serious_critical"], 3);
    assert_eq!(row["TrueConfirmed"], 110);
  }

  #[tokio::test]
  async fn update_unknown_country_returns_404() {
    let store = make_store().await;
    let (status, body) =
      send(&store, "PUT", "/update/7/2020-04-05", Some(json!({ "new_cases": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("country"));
  }

  #[tokio::test]
  async fn update_unknown_date_returns_404() {
    let store = make_store().await;
    send(&store, "POST", "/add", Some(add_body("Japan", "Asia", 125, "2020-04-05"))).await;
    let id = first_country_id(&store).await;

    let (status, _) = send(
      &store,
      "PUT",
      &format!("/update/{id}/2020-04-06"),
      Some(json!({ "new_cases": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_bad_date_returns_400() {
    let store = make_store().await;
    let (status, body) =
      send(&store, "PUT", "/update/1/05-04-2020", Some(json!({ "new_cases": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn update_bad_date_wins_over_bad_body() {
    let store = make_store().await;
    let (status, body) = send(
      &store,
      "PUT",
      "/update/1/not-a-date",
      Some(json!({ "total_cases": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not-a-date"), "{body}");
  }

  #[tokio::test]
  async fn update_mistyped_body_returns_400() {
    let store = make_store().await;
    send(&store, "POST", "/add", Some(add_body("Japan", "Asia", 125, "2020-04-05"))).await;
    let id = first_country_id(&store).await;

    let (status, body) = send(
      &store,
      "PUT",
      &format!("/update/{id}/2020-04-05"),
      Some(json!({ "total_cases": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
  }

  // ── Delete ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_removes_entry_then_404s() {
    let store = make_store().await;
    send(&store, "POST", "/add", Some(add_body("Ghana", "Africa", 31, "2020-04-07"))).await;
    send(&store, "POST", "/add", Some(add_body("Ghana", "Africa", 31, "2020-04-08"))).await;
    let id = first_country_id(&store).await;

    let (status, _) = send(&store, "DELETE", &format!("/data/{id}/2020-04-07"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, series) = send(&store, "GET", &format!("/data?id_country={id}"), None).await;
    let dates: Vec<_> = series
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["date"].as_str().unwrap().to_owned())
      .collect();
    assert_eq!(dates, vec!["2020-04-08"]);

    let (status, _) = send(&store, "DELETE", &format!("/data/{id}/2020-04-07"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, countries) = send(&store, "GET", "/countries", None).await;
    assert_eq!(countries.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn delete_bad_date_returns_400() {
    let store = make_store().await;
    let (status, _) = send(&store, "DELETE", "/data/1/yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn delete_non_numeric_country_returns_400_json() {
    let store = make_store().await;
    let (status, body) = send(&store, "DELETE", "/data/abc/2020-01-01", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "{body}");
  }

  #[tokio::test]
  async fn delete_missing_entry_returns_404() {
    let store = make_store().await;
    let (status, body) = send(&store, "DELETE", "/data/1/2020-01-01", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  // ── Store failures ───────────────────────────────────────────────────────────

  /// A store whose every call fails, as a lost database would.
  struct BrokenStore;

  fn broken<T>() -> std::future::Ready<Result<T, std::io::Error>> {
    std::future::ready(Err(std::io::Error::other("database unavailable")))
  }

  impl PandemicStore for BrokenStore {
    type Error = std::io::Error;

    fn list_countries(
      &self,
    ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_ {
      broken()
    }

    fn upsert_countries(
      &self,
      _: Vec<NewCountry>,
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_ {
      broken()
    }

    fn get_series(
      &self,
      _: i64,
    ) -> impl Future<Output = Result<Vec<SeriesRow>, Self::Error>> + Send + '_ {
      broken()
    }

    fn insert_entry(
      &self,
      _: NewEntry,
    ) -> impl Future<Output = Result<PandemicRecord, Self::Error>> + Send + '_ {
      broken()
    }

    fn update_entry(
      &self,
      _: i64,
      _: NaiveDate,
      _: EntryPatch,
    ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_ {
      broken()
    }

    fn delete_entry(
      &self,
      _: i64,
      _: NaiveDate,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_ {
      broken()
    }

    fn append_records(
      &self,
      _: Vec<NewRecord>,
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_ {
      broken()
    }
  }

  #[tokio::test]
  async fn store_failures_return_500_with_message() {
    let store = Arc::new(BrokenStore);
    let cases = [
      ("POST", "/add", Some(add_body("Peru", "South America", 33, "2020-04-01"))),
      ("PUT", "/update/1/2020-04-01", Some(json!({ "new_cases": 1 }))),
      ("GET", "/countries", None),
      ("GET", "/data?id_country=1", None),
      ("DELETE", "/data/1/2020-04-01", None),
    ];
    for (method, uri, body) in cases {
      let (status, body) = send(&store, method, uri, body).await;
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
      assert_eq!(body["error"], "database unavailable", "{method} {uri}");
    }
  }

  // ── Docs ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn openapi_document_lists_routes() {
    let store = make_store().await;
    let (status, body) = send(&store, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/countries"].is_object());
    assert!(body["paths"]["/update/{id_country}/{date}"]["put"].is_object());
  }
}
