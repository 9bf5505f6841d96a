//! Handler for `GET /reviews/trends`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use serde_json::json;
use starling_core::{
  enrich::Classifier,
  store::ReviewStore,
  trends::{DEFAULT_TREND_LIMIT, review_trends},
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct TrendParams {
  pub limit: Option<i64>,
}

/// `GET /reviews/trends[?limit=5]` — categories ranked by mean star rating
/// over current revisions.
pub async fn handler<S, C>(
  State(state): State<AppState<S, C>>,
  Query(params): Query<TrendParams>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  state.access.record("review_trends");

  let limit = params.limit.unwrap_or(DEFAULT_TREND_LIMIT);
  let trends = review_trends(state.store.as_ref(), limit).await?;
  Ok(Json(json!({ "trends": trends })))
}
