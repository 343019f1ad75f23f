//! Book records — one tracked book and its reading state.
//!
//! Display attributes come from the external catalog and are never edited
//! here. Only the reading-state attributes (notes, milestones, rating) are
//! mutated, and only through [`crate::workflow::UpdateWorkflow`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Shown in place of notes when a book has none.
pub const NOTES_PLACEHOLDER: &str = "No thoughts available.";

// ─── RecordId ────────────────────────────────────────────────────────────────

/// Storage identity assigned by the record directory on first write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for RecordId {
  fn from(id: String) -> Self { Self(id) }
}

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A star rating in `0..=5`. Out-of-range values cannot be constructed.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
  pub const MAX: u8 = 5;

  pub fn new(value: i64) -> Result<Self> {
    u8::try_from(value)
      .ok()
      .filter(|v| *v <= Self::MAX)
      .map(Self)
      .ok_or_else(|| {
        Error::InvalidInput(format!(
          "rating must be between 0 and {}, got {value}",
          Self::MAX
        ))
      })
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> { Self::new(i64::from(value)) }
}

impl From<Rating> for u8 {
  fn from(r: Rating) -> Self { r.0 }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.0, Self::MAX)
  }
}

// ─── ReadingStatus ───────────────────────────────────────────────────────────

/// Where a reader is with a book, derived from its milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
  NotStarted,
  Reading,
  Finished,
}

// ─── BookRecord ──────────────────────────────────────────────────────────────

/// One tracked book.
///
/// `started_reading_at` and `finished_reading_at` are each set at most once;
/// the workflow refuses to overwrite them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
  /// `None` until the directory has stored the record.
  pub id:                  Option<RecordId>,
  /// Identifier from the upstream catalog; the cache lookup key.
  pub catalog_id:          String,
  pub title:               Option<String>,
  pub authors:             Vec<String>,
  pub published_date:      Option<String>,
  pub photo_url:           Option<String>,
  pub notes:               Option<String>,
  pub started_reading_at:  Option<DateTime<Utc>>,
  pub finished_reading_at: Option<DateTime<Utc>>,
  pub rating:              Option<Rating>,
}

impl BookRecord {
  /// A fresh, unpersisted record with no display data and no reading state.
  pub fn new(catalog_id: impl Into<String>) -> Self {
    Self {
      id:                  None,
      catalog_id:          catalog_id.into(),
      title:               None,
      authors:             Vec::new(),
      published_date:      None,
      photo_url:           None,
      notes:               None,
      started_reading_at:  None,
      finished_reading_at: None,
      rating:              None,
    }
  }

  pub fn reading_status(&self) -> ReadingStatus {
    match (self.started_reading_at, self.finished_reading_at) {
      (_, Some(_)) => ReadingStatus::Finished,
      (Some(_), None) => ReadingStatus::Reading,
      (None, None) => ReadingStatus::NotStarted,
    }
  }

  pub fn notes_or_placeholder(&self) -> &str {
    match self.notes.as_deref() {
      Some(n) if !n.trim().is_empty() => n,
      _ => NOTES_PLACEHOLDER,
    }
  }
}
