//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; surrogate keys are native
//! SQLite integers and need no encoding.

use chrono::{DateTime, Utc};
use starling_core::review::{Category, ReviewRevision};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `categories` row.
pub struct RawCategory {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
}

impl RawCategory {
  pub fn into_category(self) -> Category {
    Category {
      id:          self.id,
      name:        self.name,
      description: self.description,
    }
  }
}

/// Raw values read directly from a `review_history` row; timestamps still
/// encoded as text.
pub struct RawRevision {
  pub id:          i64,
  pub review_id:   String,
  pub text:        String,
  pub stars:       i64,
  pub category_id: Option<i64>,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawRevision {
  pub fn into_revision(self) -> Result<ReviewRevision> {
    Ok(ReviewRevision {
      id:          self.id,
      review_id:   self.review_id,
      text:        self.text,
      stars:       self.stars,
      category_id: self.category_id,
      tone:        self.tone,
      sentiment:   self.sentiment,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}
