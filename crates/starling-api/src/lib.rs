//! JSON REST API for Starling.
//!
//! Exposes an axum [`Router`] backed by any [`starling_core::store::ReviewStore`]
//! and any [`starling_core::enrich::Classifier`]. TLS and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = starling_api::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod access;
pub mod categories;
pub mod error;
pub mod reviews;
pub mod trends;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use starling_core::{enrich::{Classifier, Enricher}, store::ReviewStore};

pub use access::AccessLog;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, C> {
  pub store:    Arc<S>,
  pub enricher: Arc<Enricher<C>>,
  pub access:   AccessLog,
}

// Manual impl: `S`/`C` themselves need not be `Clone` behind the `Arc`s.
impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      enricher: self.enricher.clone(),
      access:   self.access.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: ReviewStore + 'static,
  C: Classifier + 'static,
{
  Router::new()
    // Categories
    .route(
      "/categories",
      get(categories::list::<S, C>).post(categories::create::<S, C>),
    )
    .route("/categories/{id}/reviews", get(reviews::by_category::<S, C>))
    // Reviews
    .route(
      "/reviews",
      get(reviews::list::<S, C>).post(reviews::create::<S, C>),
    )
    .route("/reviews/trends", get(trends::handler::<S, C>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use starling_core::enrich::NullClassifier;
  use starling_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state() -> AppState<SqliteStore, NullClassifier> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    AppState {
      access:   AccessLog::spawn(store.clone()),
      enricher: Arc::new(Enricher::new(NullClassifier)),
      store,
    }
  }

  async fn request(
    state: AppState<SqliteStore, NullClassifier>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn add_category(
    state: &AppState<SqliteStore, NullClassifier>,
    name: &str,
  ) -> i64 {
    request(
      state.clone(),
      "POST",
      "/categories",
      Some(json!({ "name": name })),
    )
    .await;
    state
      .store
      .find_category_by_name(name)
      .await
      .unwrap()
      .unwrap()
      .id
  }

  async fn add_review(
    state: &AppState<SqliteStore, NullClassifier>,
    review_id: &str,
    text: &str,
    stars: i64,
    category_id: i64,
  ) {
    let (status, _) = request(
      state.clone(),
      "POST",
      "/reviews",
      Some(json!({
        "text": text,
        "stars": stars,
        "review_id": review_id,
        "category_id": category_id,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  // ── Categories ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_category_then_repeat_is_idempotent() {
    let state = make_state().await;

    let (status, body) = request(
      state.clone(),
      "POST",
      "/categories",
      Some(json!({ "name": "Electronics", "description": "gadgets" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].as_str().unwrap().contains("added"));

    let (status, body) = request(
      state,
      "POST",
      "/categories",
      Some(json!({ "name": "Electronics" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
  }

  #[tokio::test]
  async fn blank_category_name_is_rejected() {
    let state = make_state().await;
    let (status, body) =
      request(state, "POST", "/categories", Some(json!({ "name": "  " })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().is_some());
  }

  #[tokio::test]
  async fn list_categories_returns_all() {
    let state = make_state().await;
    add_category(&state, "Books").await;
    add_category(&state, "Toys").await;

    let (status, body) =
      request(state, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn add_review_and_list_round_trip() {
    let state = make_state().await;
    let cat = add_category(&state, "Electronics").await;
    add_review(&state, "r1", "solid build", 4, cat).await;

    let (status, body) = request(state, "GET", "/reviews", None).await;
    assert_eq!(status, StatusCode::OK);

    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["review_id"], "r1");
    assert_eq!(reviews[0]["text"], "solid build");
    assert_eq!(reviews[0]["stars"], 4);
    assert_eq!(reviews[0]["category_id"], cat);
    assert!(reviews[0]["tone"].is_null());
    assert!(reviews[0]["sentiment"].is_null());
  }

  #[tokio::test]
  async fn blank_review_text_is_rejected() {
    let state = make_state().await;
    let (status, _) = request(
      state,
      "POST",
      "/reviews",
      Some(json!({ "text": " ", "stars": 3, "review_id": "r1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn review_for_unknown_category_is_404() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "POST",
      "/reviews",
      Some(json!({
        "text": "nice",
        "stars": 5,
        "review_id": "r1",
        "category_id": 77,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("category 77"));
  }

  // ── Category feed ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn feed_resolves_to_latest_revision() {
    let state = make_state().await;
    let cat = add_category(&state, "Electronics").await;

    add_review(&state, "r1", "first impression", 2, cat).await;
    add_review(&state, "r1", "after a week", 3, cat).await;
    add_review(&state, "r1", "a month in, still great", 5, cat).await;

    let (status, body) = request(
      state,
      "GET",
      &format!("/categories/{cat}/reviews"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["review_id"], "r1");
    assert_eq!(reviews[0]["text"], "a month in, still great");
    assert_eq!(reviews[0]["stars"], 5);
    assert_eq!(body["total_reviews"], 1);
    assert_eq!(body["category"]["name"], "Electronics");
  }

  #[tokio::test]
  async fn feed_honours_page_size() {
    let state = make_state().await;
    let cat = add_category(&state, "Electronics").await;
    for i in 0..5 {
      add_review(&state, &format!("r{i}"), "text", i, cat).await;
    }

    let (status, body) = request(
      state,
      "GET",
      &format!("/categories/{cat}/reviews?page_size=3"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviews"].as_array().unwrap().len(), 3);
    assert_eq!(body["total_reviews"], 3);
  }

  #[tokio::test]
  async fn empty_category_feed_is_success() {
    let state = make_state().await;
    let cat = add_category(&state, "Electronics").await;

    let (status, body) = request(
      state,
      "GET",
      &format!("/categories/{cat}/reviews"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviews"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_reviews"], 0);
  }

  #[tokio::test]
  async fn unknown_category_feed_is_404() {
    let state = make_state().await;
    let (status, body) =
      request(state, "GET", "/categories/404/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn non_positive_page_size_is_rejected() {
    let state = make_state().await;
    let cat = add_category(&state, "Electronics").await;

    let (status, _) = request(
      state,
      "GET",
      &format!("/categories/{cat}/reviews?page_size=0"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Trends ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn trends_rank_categories_and_honour_limit() {
    let state = make_state().await;
    let books = add_category(&state, "Books").await;
    let toys = add_category(&state, "Toys").await;
    let games = add_category(&state, "Games").await;

    add_review(&state, "b1", "superb", 5, books).await;
    add_review(&state, "t1", "fine", 3, toys).await;
    add_review(&state, "g1", "poor", 1, games).await;

    let (status, body) =
      request(state.clone(), "GET", "/reviews/trends", None).await;
    assert_eq!(status, StatusCode::OK);

    let trends = body["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 3);
    assert_eq!(trends[0]["category"]["name"], "Books");
    assert_eq!(trends[0]["average_stars"], 5.0);
    assert_eq!(trends[0]["total_reviews"], 1);
    assert_eq!(trends[2]["category"]["name"], "Games");

    let (_, body) =
      request(state, "GET", "/reviews/trends?limit=1", None).await;
    assert_eq!(body["trends"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn non_positive_trend_limit_is_rejected() {
    let state = make_state().await;
    let (status, _) =
      request(state, "GET", "/reviews/trends?limit=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }
}
