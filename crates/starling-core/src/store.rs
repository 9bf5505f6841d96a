//! The `ReviewStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `starling-store-sqlite`).
//! Higher layers (`starling-api`, the feed/trend/enrichment operations in this
//! crate) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::review::{Category, NewCategory, NewRevision, ReviewRevision};

/// Abstraction over a Starling review store backend.
///
/// Revisions are append-only: the only UPDATE a backend may ever issue
/// against the revision log is the enrichment back-fill of
/// `tone`/`sentiment`/`updated_at` via [`update_revision_derived_fields`].
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// [`update_revision_derived_fields`]: ReviewStore::update_revision_derived_fields
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error
    + Into<crate::Error>
    + Send
    + Sync
    + 'static;

  // ── Categories ────────────────────────────────────────────────────────

  /// Look up a category by its unique name. Returns `None` if absent.
  fn find_category_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + 'a;

  /// Persist a new category. A duplicate name must surface as an error that
  /// converts to [`crate::Error::CategoryExists`], not a panic — concurrent
  /// check-then-insert races land here.
  fn insert_category(
    &self,
    input: NewCategory,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + '_;

  /// Retrieve a category by surrogate id. Returns `None` if not found.
  fn get_category(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  /// List all categories in insertion order.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  // ── Revisions — append-only writes ────────────────────────────────────

  /// Append a revision and return the persisted row. The store assigns the
  /// surrogate `id` (monotonically increasing) and both timestamps.
  fn insert_revision(
    &self,
    input: NewRevision,
  ) -> impl Future<Output = Result<ReviewRevision, Self::Error>> + Send + '_;

  // ── Revisions — reads ─────────────────────────────────────────────────

  /// All revisions belonging to one category, in insertion order. This is
  /// the category-restricted resolution scope.
  fn list_revisions_by_category(
    &self,
    category_id: i64,
  ) -> impl Future<Output = Result<Vec<ReviewRevision>, Self::Error>> + Send + '_;

  /// Every revision in the log, in insertion order. This is the
  /// unrestricted resolution scope used by the trend aggregator.
  fn list_all_revisions(
    &self,
  ) -> impl Future<Output = Result<Vec<ReviewRevision>, Self::Error>> + Send + '_;

  // ── Enrichment back-fill ──────────────────────────────────────────────

  /// Write derived fields onto one specific revision row, addressed by
  /// surrogate `id` (never by `review_id`, which would touch a different
  /// historical row). The only mutation the revision log ever sees.
  fn update_revision_derived_fields<'a>(
    &'a self,
    id: i64,
    tone: Option<&'a str>,
    sentiment: Option<&'a str>,
    updated_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Access log ────────────────────────────────────────────────────────

  /// Append a line to the write-only access log. Never read by the engine.
  fn record_access<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
