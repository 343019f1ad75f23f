//! [`UpdateWorkflow`] — edit one book's reading state and write it back.
//!
//! A workflow is opened on a record found in the [`BookRecordCache`]. Edits
//! stay local until [`UpdateWorkflow::commit`], which writes the whole record
//! through to the [`RecordDirectory`] keyed by its storage id.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
  Error, Milestone, Result,
  book::{BookRecord, Rating},
  cache::BookRecordCache,
  directory::RecordDirectory,
};

/// Knobs for product rules the workflow does not hard-code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkflowOptions {
  /// Refuse to mark a book finished before it has been marked started.
  /// Off by default: the two milestones are independent.
  pub require_started_before_finished: bool,
}

/// An edit session on a single [`BookRecord`].
pub struct UpdateWorkflow<D> {
  directory: Arc<D>,
  options:   WorkflowOptions,
  record:    BookRecord,
}

impl<D: RecordDirectory> UpdateWorkflow<D> {
  /// Open a workflow on the cached record with `catalog_id`.
  ///
  /// Fails with [`Error::NotFound`] if the cache has no such record; the
  /// caller has nothing to edit in that case.
  pub fn load_for_editing(
    directory: Arc<D>,
    cache: &BookRecordCache,
    catalog_id: &str,
  ) -> Result<Self> {
    let record = cache.find(catalog_id)?.clone();
    debug!(catalog_id, "opened book for editing");
    Ok(Self { directory, options: WorkflowOptions::default(), record })
  }

  pub fn with_options(mut self, options: WorkflowOptions) -> Self {
    self.options = options;
    self
  }

  /// The record as currently edited.
  pub fn record(&self) -> &BookRecord { &self.record }

  /// Replace the notes. Any text is accepted; it is trimmed on commit.
  pub fn set_notes(&mut self, text: impl Into<String>) {
    self.record.notes = Some(text.into());
  }

  /// Mark the book as started now. Rejected if it is already started.
  pub fn mark_started(&mut self) -> Result<DateTime<Utc>> {
    self.mark_started_at(Utc::now())
  }

  pub fn mark_started_at(&mut self, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if self.record.started_reading_at.is_some() {
      return Err(Error::AlreadyMarked(Milestone::Started));
    }
    self.record.started_reading_at = Some(at);
    debug!(catalog_id = %self.record.catalog_id, %at, "marked started");
    Ok(at)
  }

  /// Mark the book as finished now. Rejected if it is already finished.
  pub fn mark_finished(&mut self) -> Result<DateTime<Utc>> {
    self.mark_finished_at(Utc::now())
  }

  pub fn mark_finished_at(&mut self, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if self.record.finished_reading_at.is_some() {
      return Err(Error::AlreadyMarked(Milestone::Finished));
    }
    if self.options.require_started_before_finished
      && self.record.started_reading_at.is_none()
    {
      return Err(Error::InvalidInput(
        "a book must be started before it can be finished".into(),
      ));
    }
    self.record.finished_reading_at = Some(at);
    debug!(catalog_id = %self.record.catalog_id, %at, "marked finished");
    Ok(at)
  }

  /// Set the rating; anything outside `0..=5` is [`Error::InvalidInput`].
  pub fn set_rating(&mut self, value: i64) -> Result<Rating> {
    let rating = Rating::new(value)?;
    self.record.rating = Some(rating);
    Ok(rating)
  }

  /// Write the full record to the directory and return what was written.
  ///
  /// Nothing guards against two commits of the same record racing each
  /// other; the last write wins.
  pub async fn commit(&mut self) -> Result<BookRecord> {
    let id = self
      .record
      .id
      .clone()
      .ok_or_else(|| Error::NotPersisted(self.record.catalog_id.clone()))?;

    let mut outgoing = self.record.clone();
    if let Some(notes) = outgoing.notes.as_mut() {
      *notes = notes.trim().to_string();
    }

    if let Err(e) = self.directory.update_book(&id, &outgoing).await {
      warn!(%id, error = %e, "book update rejected");
      return Err(Error::remote_write(e));
    }

    info!(%id, catalog_id = %outgoing.catalog_id, "book updated");
    self.record = outgoing.clone();
    Ok(outgoing)
  }
}
