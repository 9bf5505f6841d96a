//! Fire-and-forget access logging.
//!
//! Each inbound request dispatches one free-text description to a detached
//! worker that appends it to the store's access log. The read/write path
//! never awaits the worker and never observes its failures — the log has no
//! ordering guarantee relative to the response and no effect on its content.

use std::sync::Arc;

use starling_core::store::ReviewStore;
use tokio::sync::mpsc;

/// A cheap, cloneable handle for dispatching access-log entries.
#[derive(Clone)]
pub struct AccessLog {
  tx: mpsc::UnboundedSender<String>,
}

impl AccessLog {
  /// Spawn the log worker on the current runtime and return its handle.
  /// The worker drains until every handle is dropped.
  pub fn spawn<S>(store: Arc<S>) -> Self
  where
    S: ReviewStore + 'static,
  {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
      while let Some(text) = rx.recv().await {
        if let Err(e) = store.record_access(&text).await {
          tracing::warn!(error = %e, "access log write failed");
        }
      }
    });

    Self { tx }
  }

  /// Queue one description. Never blocks, never fails the caller; a closed
  /// channel only happens during shutdown, where the entry is dropped.
  pub fn record(&self, description: impl Into<String>) {
    let _ = self.tx.send(description.into());
  }
}
