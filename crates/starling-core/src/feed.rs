//! The category feed builder.
//!
//! Resolves the current revisions of one category, orders them by recency,
//! truncates to a page, and runs the page through the enrichment pipeline
//! before returning. Enrichment performed during the call is reflected in
//! the returned rows.

use serde::Serialize;

use crate::{
  Error, Result,
  enrich::{Classifier, Enricher},
  resolve::resolve_current,
  review::{Category, ReviewRevision},
  store::ReviewStore,
};

/// Default page size when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: i64 = 15;

/// One page of current revisions for a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryFeed {
  pub category:       Category,
  /// Current revisions, `created_at` descending, at most `page_size` rows.
  pub reviews:        Vec<ReviewRevision>,
  pub total_returned: usize,
}

/// Build a paginated, recency-ordered feed of current revisions for
/// `category_id`.
///
/// Fails with [`Error::CategoryNotFound`] for an unknown category and
/// [`Error::InvalidPageSize`] for a non-positive `page_size`. A category
/// with no revisions yields an empty page, not an error.
pub async fn category_feed<S, C>(
  store: &S,
  enricher: &Enricher<C>,
  category_id: i64,
  page_size: i64,
) -> Result<CategoryFeed>
where
  S: ReviewStore,
  C: Classifier,
{
  if page_size < 1 {
    return Err(Error::InvalidPageSize(page_size));
  }

  let category = store
    .get_category(category_id)
    .await
    .map_err(Into::into)?
    .ok_or(Error::CategoryNotFound(category_id))?;

  let revisions = store
    .list_revisions_by_category(category_id)
    .await
    .map_err(Into::into)?;

  // resolve_current already orders by created_at descending.
  let mut page = resolve_current(revisions);
  page.truncate(page_size as usize);

  let reviews = enricher.enrich_page(store, page).await?;
  let total_returned = reviews.len();

  Ok(CategoryFeed { category, reviews, total_returned })
}
