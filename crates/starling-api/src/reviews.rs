//! Handlers for `/reviews` and the category feed endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/reviews` | Body: [`CreateBody`]; appends one revision |
//! | `GET`  | `/reviews` | The raw revision log, insertion order |
//! | `GET`  | `/categories/:id/reviews` | Current revisions, paginated, enriched |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use starling_core::{
  enrich::Classifier,
  feed::{DEFAULT_PAGE_SIZE, category_feed},
  review::NewRevision,
  store::ReviewStore,
};

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /reviews`. Submitting an existing `review_id`
/// appends a new revision; the previous ones remain in the log.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub text:        String,
  pub stars:       i64,
  pub review_id:   String,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub category_id: Option<i64>,
}

/// `POST /reviews` — returns 201 + `{"message":...}`.
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  state.access.record(format!("add_review {:?}", body.review_id));

  if body.text.trim().is_empty() {
    return Err(ApiError::InvalidArgument(
      "review text must not be blank".to_string(),
    ));
  }
  if body.review_id.trim().is_empty() {
    return Err(ApiError::InvalidArgument(
      "review_id must not be blank".to_string(),
    ));
  }

  if let Some(category_id) = body.category_id {
    state
      .store
      .get_category(category_id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        ApiError::NotFound(format!("category {category_id} not found"))
      })?;
  }

  let revision = state
    .store
    .insert_revision(NewRevision {
      review_id:   body.review_id,
      text:        body.text,
      stars:       body.stars,
      category_id: body.category_id,
      tone:        body.tone,
      sentiment:   body.sentiment,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "message": format!("review {:?} added", revision.review_id)
    })),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /reviews` — every revision in the log, not just current ones.
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  state.access.record("list_reviews");

  let reviews = state
    .store
    .list_all_revisions()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "reviews": reviews })))
}

// ─── Category feed ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedParams {
  pub page_size: Option<i64>,
}

/// `GET /categories/:id/reviews[?page_size=15]`
pub async fn by_category<S, C>(
  State(state): State<AppState<S, C>>,
  Path(category_id): Path<i64>,
  Query(params): Query<FeedParams>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  state
    .access
    .record(format!("reviews_by_category {category_id}"));

  let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
  let feed =
    category_feed(state.store.as_ref(), &state.enricher, category_id, page_size)
      .await?;

  Ok(Json(json!({
    "category":      feed.category,
    "reviews":       feed.reviews,
    "total_reviews": feed.total_returned,
  })))
}
