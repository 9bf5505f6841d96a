//! Handlers for `/categories` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/categories` | All categories |
//! | `POST` | `/categories` | Body: [`CreateBody`]; idempotent create-if-absent |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use starling_core::{
  enrich::Classifier, review::NewCategory, store::ReviewStore,
};

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        String,
  pub description: Option<String>,
}

/// `POST /categories` — body: `{"name":"Electronics","description":"..."}`.
///
/// Create-if-absent: an existing name answers 200 with a message rather than
/// an error. Only the losing side of a concurrent insert race sees a 409.
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  state.access.record(format!("add_category {:?}", body.name));

  let name = body.name.trim().to_string();
  if name.is_empty() {
    return Err(ApiError::InvalidArgument(
      "category name must not be blank".to_string(),
    ));
  }

  if let Some(existing) = state
    .store
    .find_category_by_name(&name)
    .await
    .map_err(ApiError::store)?
  {
    return Ok((
      StatusCode::OK,
      Json(json!({
        "message": format!("category {:?} already exists", existing.name)
      })),
    ));
  }

  let category = state
    .store
    .insert_category(NewCategory { name, description: body.description })
    .await
    .map_err(ApiError::store)?;

  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": format!("category {:?} added", category.name) })),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /categories`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  state.access.record("list_categories");

  let categories = state
    .store
    .list_categories()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "categories": categories })))
}
