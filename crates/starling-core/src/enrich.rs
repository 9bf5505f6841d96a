//! The enrichment pipeline — lazy, per-row back-fill of derived fields.
//!
//! A revision missing `tone` or `sentiment` is sent to an external text
//! classifier during reads. The raw reply is decoded defensively (strict
//! JSON first, then a bracket-extraction fallback), persisted onto the
//! specific revision row, and merged into the returned value. Once both
//! fields are populated a revision is never re-classified.
//!
//! Classifier failures of any kind — unreachable service, timeout, missing
//! credentials, unparsable reply — are soft: they are logged and the
//! revision is returned unchanged. Only a failed store write propagates.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::{Result, review::ReviewRevision, store::ReviewStore};

// ─── Classifier capability ───────────────────────────────────────────────────

/// An error from a [`Classifier`] implementation. Always absorbed by the
/// pipeline; never propagated to the enclosing read.
#[derive(Debug, Error)]
pub enum ClassifyError {
  /// No classifier is configured (missing credentials / no endpoint).
  #[error("no classifier configured")]
  Unconfigured,

  /// The classifier was reached but the call failed (network, timeout,
  /// auth, non-success status).
  #[error("classifier request failed: {0}")]
  Request(String),

  /// The classifier answered but the reply carried no usable content.
  #[error("classifier reply malformed: {0}")]
  Reply(String),
}

/// A text-classification capability: given review text and its star rating,
/// produce a raw reply expected (but not guaranteed) to contain a JSON
/// object with `tone` and `sentiment` keys.
pub trait Classifier: Send + Sync {
  fn classify<'a>(
    &'a self,
    text: &'a str,
    stars: i64,
  ) -> impl Future<Output = Result<String, ClassifyError>> + Send + 'a;
}

impl<C: Classifier> Classifier for Arc<C> {
  fn classify<'a>(
    &'a self,
    text: &'a str,
    stars: i64,
  ) -> impl Future<Output = Result<String, ClassifyError>> + Send + 'a {
    (**self).classify(text, stars)
  }
}

/// The classifier wired when no credentials are configured. Every call
/// reports [`ClassifyError::Unconfigured`], which the pipeline degrades to
/// "fields remain null."
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClassifier;

impl Classifier for NullClassifier {
  async fn classify(&self, _text: &str, _stars: i64) -> Result<String, ClassifyError> {
    Err(ClassifyError::Unconfigured)
  }
}

// ─── Verdict parsing ─────────────────────────────────────────────────────────

/// The structured payload expected inside a classifier reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verdict {
  #[serde(default)]
  pub tone:      Option<String>,
  #[serde(default)]
  pub sentiment: Option<String>,
}

impl Verdict {
  fn is_empty(&self) -> bool {
    self.tone.is_none() && self.sentiment.is_none()
  }
}

/// Best-effort decode of a raw classifier reply.
///
/// Strict JSON parse first; on failure, slice from the first `{` to the
/// last `}` and retry — replies often wrap the object in prose or code
/// fences. Returns `None` when neither attempt yields a verdict.
pub fn parse_verdict(raw: &str) -> Option<Verdict> {
  if let Ok(v) = serde_json::from_str::<Verdict>(raw) {
    return Some(v);
  }

  let start = raw.find('{')?;
  let end = raw.rfind('}')?;
  if end <= start {
    return None;
  }
  serde_json::from_str::<Verdict>(&raw[start..=end]).ok()
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Upper bound on a single classifier call when the caller does not pick one.
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(30);

/// The enrichment pipeline. Holds the classifier capability and the per-call
/// timeout; the store is supplied per operation so one enricher serves any
/// backend.
pub struct Enricher<C> {
  classifier: C,
  timeout:    Duration,
}

impl<C: Classifier> Enricher<C> {
  pub fn new(classifier: C) -> Self {
    Self { classifier, timeout: DEFAULT_CLASSIFY_TIMEOUT }
  }

  pub fn with_timeout(classifier: C, timeout: Duration) -> Self {
    Self { classifier, timeout }
  }

  /// Enrich one revision, returning it with `tone`/`sentiment` populated if
  /// they were missing and could be derived, unchanged otherwise.
  ///
  /// Idempotent short-circuit: a fully-enriched revision is returned as-is
  /// with zero classifier calls. A best-effort race remains under
  /// concurrency — two concurrent fills of the same row may both classify,
  /// and the second write wins.
  pub async fn enrich<S: ReviewStore>(
    &self,
    store: &S,
    mut revision: ReviewRevision,
  ) -> Result<ReviewRevision> {
    if revision.is_enriched() {
      return Ok(revision);
    }

    let reply = match tokio::time::timeout(
      self.timeout,
      self.classifier.classify(&revision.text, revision.stars),
    )
    .await
    {
      Err(_) => {
        tracing::warn!(
          revision = revision.id,
          timeout_ms = self.timeout.as_millis() as u64,
          "classifier call timed out; leaving revision unenriched"
        );
        return Ok(revision);
      }
      Ok(Err(ClassifyError::Unconfigured)) => {
        tracing::debug!(revision = revision.id, "no classifier configured");
        return Ok(revision);
      }
      Ok(Err(e)) => {
        tracing::warn!(
          revision = revision.id,
          error = %e,
          "classifier call failed; leaving revision unenriched"
        );
        return Ok(revision);
      }
      Ok(Ok(reply)) => reply,
    };

    let verdict = match parse_verdict(&reply) {
      Some(v) if !v.is_empty() => v,
      _ => {
        tracing::warn!(
          revision = revision.id,
          "classifier reply carried no verdict; leaving revision unenriched"
        );
        return Ok(revision);
      }
    };

    // Persist against the surrogate id so no other historical row of the
    // same logical review is touched. A store failure here is a real
    // store-layer error and does propagate.
    let now = Utc::now();
    store
      .update_revision_derived_fields(
        revision.id,
        verdict.tone.as_deref(),
        verdict.sentiment.as_deref(),
        now,
      )
      .await
      .map_err(Into::into)?;

    revision.tone = verdict.tone;
    revision.sentiment = verdict.sentiment;
    revision.updated_at = now;
    Ok(revision)
  }

  /// Run [`enrich`](Self::enrich) over a page of revisions in order,
  /// preserving positions. Rows that could not be enriched pass through
  /// unchanged.
  pub async fn enrich_page<S: ReviewStore>(
    &self,
    store: &S,
    page: Vec<ReviewRevision>,
  ) -> Result<Vec<ReviewRevision>> {
    let mut out = Vec::with_capacity(page.len());
    for revision in page {
      out.push(self.enrich(store, revision).await?);
    }
    Ok(out)
  }
}
