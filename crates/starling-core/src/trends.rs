//! The trend aggregator.
//!
//! Resolves the whole log to one current revision per logical review, then
//! groups by category to produce per-category counts and mean ratings,
//! ranked best-rated first.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  Error, Result, resolve::resolve_current, review::Category,
  store::ReviewStore,
};

/// Default number of trend rows when the caller does not pick one.
pub const DEFAULT_TREND_LIMIT: i64 = 5;

/// Aggregate statistics for one category, computed over current revisions
/// only.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTrend {
  pub category:      Category,
  pub total_reviews: u64,
  pub average_stars: f64,
}

/// Compute category trends over the unrestricted resolution scope.
///
/// Revisions with no category are excluded. Only categories with at least
/// one current revision appear. Output is ordered by `average_stars`
/// descending, ties broken by category id ascending, truncated to `limit`.
/// Fails with [`Error::InvalidLimit`] for a non-positive `limit`.
pub async fn review_trends<S>(store: &S, limit: i64) -> Result<Vec<CategoryTrend>>
where
  S: ReviewStore,
{
  if limit < 1 {
    return Err(Error::InvalidLimit(limit));
  }

  let current = resolve_current(
    store.list_all_revisions().await.map_err(Into::into)?,
  );

  // category_id -> (count, sum of stars). BTreeMap keeps grouping
  // deterministic before the final sort.
  let mut groups: BTreeMap<i64, (u64, i64)> = BTreeMap::new();
  for rev in &current {
    if let Some(category_id) = rev.category_id {
      let entry = groups.entry(category_id).or_insert((0, 0));
      entry.0 += 1;
      entry.1 += rev.stars;
    }
  }

  let categories = store.list_categories().await.map_err(Into::into)?;

  let mut trends: Vec<CategoryTrend> = categories
    .into_iter()
    .filter_map(|category| {
      let (count, sum) = groups.get(&category.id).copied()?;
      Some(CategoryTrend {
        category,
        total_reviews: count,
        average_stars: sum as f64 / count as f64,
      })
    })
    .collect();

  trends.sort_by(|a, b| {
    b.average_stars
      .total_cmp(&a.average_stars)
      .then(a.category.id.cmp(&b.category.id))
  });
  trends.truncate(limit as usize);

  Ok(trends)
}
