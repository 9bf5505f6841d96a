//! The revision resolver — latest-wins resolution of the append-only log.
//!
//! The scope of a resolution is whatever slice of the log the caller hands
//! in: [`ReviewStore::list_revisions_by_category`] for a category-restricted
//! scope, [`ReviewStore::list_all_revisions`] for the unrestricted one. The
//! reduction itself is pure and independent of the storage backend.
//!
//! [`ReviewStore::list_revisions_by_category`]: crate::store::ReviewStore::list_revisions_by_category
//! [`ReviewStore::list_all_revisions`]: crate::store::ReviewStore::list_all_revisions

use std::collections::HashMap;

use crate::review::ReviewRevision;

/// Reduce a slice of the revision log to one current revision per logical
/// `review_id`.
///
/// Within each `review_id` partition the revision with the maximum
/// `created_at` survives; equal timestamps are broken by the maximum
/// surrogate `id` (most recently inserted wins), so the result is
/// deterministic. The output is ordered by `created_at` descending, same
/// tie-break, giving callers a recency-ordered sequence. Empty input yields
/// empty output.
pub fn resolve_current(revisions: Vec<ReviewRevision>) -> Vec<ReviewRevision> {
  let mut current: HashMap<String, ReviewRevision> = HashMap::new();

  for rev in revisions {
    match current.get(&rev.review_id) {
      Some(held) if !supersedes(&rev, held) => {}
      _ => {
        current.insert(rev.review_id.clone(), rev);
      }
    }
  }

  let mut resolved: Vec<ReviewRevision> = current.into_values().collect();
  resolved.sort_by(|a, b| {
    b.created_at
      .cmp(&a.created_at)
      .then(b.id.cmp(&a.id))
  });
  resolved
}

/// Whether `candidate` is more current than `held` within one partition.
fn supersedes(candidate: &ReviewRevision, held: &ReviewRevision) -> bool {
  (candidate.created_at, candidate.id) > (held.created_at, held.id)
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;

  fn rev(id: i64, review_id: &str, minutes: i64) -> ReviewRevision {
    let at = Utc::now() + Duration::minutes(minutes);
    ReviewRevision {
      id,
      review_id: review_id.to_string(),
      text: format!("revision {id}"),
      stars: id,
      category_id: None,
      tone: None,
      sentiment: None,
      created_at: at,
      updated_at: at,
    }
  }

  #[test]
  fn empty_input_yields_empty_output() {
    assert!(resolve_current(vec![]).is_empty());
  }

  #[test]
  fn latest_timestamp_wins_per_review() {
    let resolved =
      resolve_current(vec![rev(1, "r1", 0), rev(2, "r1", 5), rev(3, "r1", 2)]);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, 2);
  }

  #[test]
  fn one_survivor_per_distinct_review() {
    let resolved = resolve_current(vec![
      rev(1, "r1", 0),
      rev(2, "r2", 1),
      rev(3, "r1", 3),
      rev(4, "r3", 2),
    ]);
    assert_eq!(resolved.len(), 3);
    let mut keys: Vec<&str> =
      resolved.iter().map(|r| r.review_id.as_str()).collect();
    keys.sort();
    assert_eq!(keys, ["r1", "r2", "r3"]);
  }

  #[test]
  fn equal_timestamps_break_ties_by_max_id() {
    let at = Utc::now();
    let mut a = rev(1, "r1", 0);
    let mut b = rev(7, "r1", 0);
    a.created_at = at;
    b.created_at = at;

    // Insertion order must not matter.
    let resolved = resolve_current(vec![b.clone(), a.clone()]);
    assert_eq!(resolved[0].id, 7);
    let resolved = resolve_current(vec![a, b]);
    assert_eq!(resolved[0].id, 7);
  }

  #[test]
  fn output_is_recency_ordered() {
    let resolved = resolve_current(vec![
      rev(1, "r1", 1),
      rev(2, "r2", 9),
      rev(3, "r3", 4),
    ]);
    let ids: Vec<i64> = resolved.iter().map(|r| r.id).collect();
    assert_eq!(ids, [2, 3, 1]);
  }
}
