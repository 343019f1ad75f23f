//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, author lists are compact JSON arrays,
//! and ratings are plain integers.

use chrono::{DateTime, Utc};
use shelf_core::book::{BookRecord, Rating, RecordId};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Authors ─────────────────────────────────────────────────────────────────

pub fn encode_authors(authors: &[String]) -> Result<String> {
  Ok(serde_json::to_string(authors)?)
}

pub fn decode_authors(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Email ───────────────────────────────────────────────────────────────────

/// Accounts are keyed on the trimmed, lowercased address.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

// ─── Books ───────────────────────────────────────────────────────────────────

/// Column values for a book row, ready to bind.
pub struct BookColumns {
  pub catalog_id:          String,
  pub title:               Option<String>,
  pub authors:             String,
  pub published_date:      Option<String>,
  pub photo_url:           Option<String>,
  pub notes:               Option<String>,
  pub started_reading_at:  Option<String>,
  pub finished_reading_at: Option<String>,
  pub rating:              Option<i64>,
}

impl BookColumns {
  pub fn from_book(book: &BookRecord) -> Result<Self> {
    Ok(Self {
      catalog_id:          book.catalog_id.clone(),
      title:               book.title.clone(),
      authors:             encode_authors(&book.authors)?,
      published_date:      book.published_date.clone(),
      photo_url:           book.photo_url.clone(),
      notes:               book.notes.clone(),
      started_reading_at:  book.started_reading_at.map(encode_dt),
      finished_reading_at: book.finished_reading_at.map(encode_dt),
      rating:              book.rating.map(|r| i64::from(r.get())),
    })
  }
}

/// A `books` row as read from SQLite, before decoding.
pub struct RawBook {
  pub record_id: String,
  pub columns:   BookColumns,
}

impl RawBook {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id: row.get(0)?,
      columns:   BookColumns {
        catalog_id:          row.get(1)?,
        title:               row.get(2)?,
        authors:             row.get(3)?,
        published_date:      row.get(4)?,
        photo_url:           row.get(5)?,
        notes:               row.get(6)?,
        started_reading_at:  row.get(7)?,
        finished_reading_at: row.get(8)?,
        rating:              row.get(9)?,
      },
    })
  }

  pub fn into_book(self) -> Result<BookRecord> {
    let c = self.columns;
    Ok(BookRecord {
      id:                  Some(RecordId::new(self.record_id)),
      catalog_id:          c.catalog_id,
      title:               c.title,
      authors:             decode_authors(&c.authors)?,
      published_date:      c.published_date,
      photo_url:           c.photo_url,
      notes:               c.notes,
      started_reading_at:  c.started_reading_at.as_deref().map(decode_dt).transpose()?,
      finished_reading_at: c.finished_reading_at.as_deref().map(decode_dt).transpose()?,
      rating:              c.rating.map(Rating::new).transpose()?,
    })
  }
}
