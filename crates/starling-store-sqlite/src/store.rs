//! [`SqliteStore`] — the SQLite implementation of [`ReviewStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use starling_core::{
  review::{Category, NewCategory, NewRevision, ReviewRevision},
  store::ReviewStore,
};

use crate::{
  Error, Result,
  encode::{RawCategory, RawRevision, encode_dt},
  schema::SCHEMA,
};

const REVISION_COLUMNS: &str =
  "id, review_id, text, stars, category_id, tone, sentiment, created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Starling review store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn raw_revision(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRevision> {
  Ok(RawRevision {
    id:          row.get(0)?,
    review_id:   row.get(1)?,
    text:        row.get(2)?,
    stars:       row.get(3)?,
    category_id: row.get(4)?,
    tone:        row.get(5)?,
    sentiment:   row.get(6)?,
    created_at:  row.get(7)?,
    updated_at:  row.get(8)?,
  })
}

fn raw_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCategory> {
  Ok(RawCategory {
    id:          row.get(0)?,
    name:        row.get(1)?,
    description: row.get(2)?,
  })
}

/// Whether a `tokio_rusqlite` error wraps a SQLite UNIQUE/constraint
/// violation.
fn is_constraint_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = Error;

  // ── Categories ────────────────────────────────────────────────────────────

  async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
    let name = name.to_owned();

    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, description FROM categories WHERE name = ?1",
              rusqlite::params![name],
              raw_category,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawCategory::into_category))
  }

  async fn insert_category(&self, input: NewCategory) -> Result<Category> {
    let name = input.name.clone();
    let description = input.description.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO categories (name, description) VALUES (?1, ?2)",
          rusqlite::params![input.name, input.description],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| {
        if is_constraint_violation(&e) {
          Error::DuplicateCategory(name.clone())
        } else {
          Error::Database(e)
        }
      })?;

    Ok(Category { id, name, description })
  }

  async fn get_category(&self, id: i64) -> Result<Option<Category>> {
    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, description FROM categories WHERE id = ?1",
              rusqlite::params![id],
              raw_category,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawCategory::into_category))
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let raws: Vec<RawCategory> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, name, description FROM categories ORDER BY id")?;
        let rows = stmt
          .query_map([], raw_category)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawCategory::into_category).collect())
  }

  // ── Revisions — append-only writes ────────────────────────────────────────

  async fn insert_revision(&self, input: NewRevision) -> Result<ReviewRevision> {
    let now = Utc::now();
    let at_str = encode_dt(now);

    let revision = ReviewRevision {
      id:          0, // assigned below
      review_id:   input.review_id,
      text:        input.text,
      stars:       input.stars,
      category_id: input.category_id,
      tone:        input.tone,
      sentiment:   input.sentiment,
      created_at:  now,
      updated_at:  now,
    };

    let row = revision.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO review_history
             (review_id, text, stars, category_id, tone, sentiment,
              created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            row.review_id,
            row.text,
            row.stars,
            row.category_id,
            row.tone,
            row.sentiment,
            at_str,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ReviewRevision { id, ..revision })
  }

  // ── Revisions — reads ─────────────────────────────────────────────────────

  async fn list_revisions_by_category(
    &self,
    category_id: i64,
  ) -> Result<Vec<ReviewRevision>> {
    let raws: Vec<RawRevision> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVISION_COLUMNS} FROM review_history
           WHERE category_id = ?1
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![category_id], raw_revision)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }

  async fn list_all_revisions(&self) -> Result<Vec<ReviewRevision>> {
    let raws: Vec<RawRevision> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVISION_COLUMNS} FROM review_history ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], raw_revision)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }

  // ── Enrichment back-fill ──────────────────────────────────────────────────

  async fn update_revision_derived_fields(
    &self,
    id: i64,
    tone: Option<&str>,
    sentiment: Option<&str>,
    updated_at: DateTime<Utc>,
  ) -> Result<()> {
    let tone = tone.map(str::to_owned);
    let sentiment = sentiment.map(str::to_owned);
    let at_str = encode_dt(updated_at);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE review_history
           SET tone = ?1, sentiment = ?2, updated_at = ?3
           WHERE id = ?4",
          rusqlite::params![tone, sentiment, at_str, id],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::RevisionNotFound(id));
    }
    Ok(())
  }

  // ── Access log ────────────────────────────────────────────────────────────

  async fn record_access(&self, text: &str) -> Result<()> {
    let text = text.to_owned();
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO access_log (text, created_at) VALUES (?1, ?2)",
          rusqlite::params![text, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
