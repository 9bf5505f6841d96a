//! Review and category domain types.
//!
//! A review is a logical entity identified by its `review_id` business key.
//! Every edit appends a [`ReviewRevision`] row; the store never updates or
//! deletes a revision, with the single exception of the derived
//! `tone`/`sentiment` pair back-filled by the enrichment pipeline. The
//! "current" state of a review is computed at read time (see
//! [`crate::resolve`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Category ────────────────────────────────────────────────────────────────

/// A review category. Immutable once created; there is no update or delete
/// path for categories in normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          i64,
  /// Unique human-readable name, e.g. `"Electronics"`.
  pub name:        String,
  pub description: Option<String>,
}

/// Input to [`crate::store::ReviewStore::insert_category`].
/// The surrogate `id` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewCategory {
  pub name:        String,
  pub description: Option<String>,
}

// ─── Review revisions ────────────────────────────────────────────────────────

/// One immutable snapshot in a review's edit history.
///
/// `review_id` is shared by all revisions of one logical review; `id` is the
/// per-row surrogate key, monotonically assigned at insert. `tone` and
/// `sentiment` start out `None` unless supplied at submission, and may be
/// back-filled exactly once by the enrichment pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRevision {
  pub id:          i64,
  /// Logical key identifying one review across its edit history.
  pub review_id:   String,
  pub text:        String,
  /// Integer rating. No range is enforced.
  pub stars:       i64,
  pub category_id: Option<i64>,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  /// Store-assigned timestamp; never changes after insert.
  pub created_at:  DateTime<Utc>,
  /// Refreshed when the enrichment pipeline back-fills derived fields.
  pub updated_at:  DateTime<Utc>,
}

impl ReviewRevision {
  /// Whether both derived fields are already populated, in which case the
  /// enrichment pipeline never re-classifies this revision.
  pub fn is_enriched(&self) -> bool {
    self.tone.is_some() && self.sentiment.is_some()
  }
}

/// Input to [`crate::store::ReviewStore::insert_revision`].
/// Both timestamps are always set by the store; they are not accepted from
/// callers. Caller-supplied `tone`/`sentiment` are allowed and count as
/// already enriched.
#[derive(Debug, Clone)]
pub struct NewRevision {
  pub review_id:   String,
  pub text:        String,
  pub stars:       i64,
  pub category_id: Option<i64>,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
}

impl NewRevision {
  /// Convenience constructor with no category and no derived fields.
  pub fn new(
    review_id: impl Into<String>,
    text: impl Into<String>,
    stars: i64,
  ) -> Self {
    Self {
      review_id:   review_id.into(),
      text:        text.into(),
      stars,
      category_id: None,
      tone:        None,
      sentiment:   None,
    }
  }
}
