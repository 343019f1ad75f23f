//! [`BookRecordCache`] — the host-owned snapshot of fetched book records.

use tracing::{debug, warn};

use crate::{Error, Result, book::BookRecord, directory::RecordDirectory};

/// Read-only view handed to the host for rendering.
#[derive(Debug, Clone, Copy)]
pub struct CacheSnapshot<'a> {
  pub records: &'a [BookRecord],
  pub loading: bool,
  pub error:   Option<&'a Error>,
}

/// The last-fetched list of book records, plus a loading flag and the error
/// from the most recent failed fetch.
///
/// Not shared across threads: the host that created it owns it.
#[derive(Debug, Clone)]
pub struct BookRecordCache {
  records: Vec<BookRecord>,
  loading: bool,
  error:   Option<Error>,
}

impl Default for BookRecordCache {
  fn default() -> Self { Self::new() }
}

impl BookRecordCache {
  /// An empty cache that has not been populated yet; reports `loading`.
  pub fn new() -> Self {
    Self { records: Vec::new(), loading: true, error: None }
  }

  /// A cache already holding `records`.
  pub fn from_records(records: Vec<BookRecord>) -> Self {
    Self { records, loading: false, error: None }
  }

  pub fn snapshot(&self) -> CacheSnapshot<'_> {
    CacheSnapshot {
      records: &self.records,
      loading: self.loading,
      error:   self.error.as_ref(),
    }
  }

  pub fn records(&self) -> &[BookRecord] { &self.records }

  pub fn is_loading(&self) -> bool { self.loading }

  pub fn error(&self) -> Option<&Error> { self.error.as_ref() }

  /// The first record whose catalog id is `catalog_id`.
  pub fn find(&self, catalog_id: &str) -> Result<&BookRecord> {
    self
      .records
      .iter()
      .find(|b| b.catalog_id == catalog_id)
      .ok_or_else(|| Error::NotFound(catalog_id.to_string()))
  }

  /// Replace the contents with everything in `directory`.
  ///
  /// On failure the previous records are kept, the error is stored in the
  /// error slot, and the same error is returned.
  pub async fn refresh<D>(&mut self, directory: &D) -> Result<&[BookRecord]>
  where
    D: RecordDirectory,
  {
    self.loading = true;
    let fetched = directory.list_books().await;
    self.loading = false;

    match fetched {
      Ok(records) => {
        debug!(count = records.len(), "book records fetched");
        self.records = records;
        self.error = None;
        Ok(&self.records)
      }
      Err(e) => {
        warn!(error = %e, "failed to fetch book records");
        let err = Error::remote_read(e);
        self.error = Some(err.clone());
        Err(err)
      }
    }
  }

  /// Put a committed record back in place, matched by catalog id. A record
  /// that is not cached yet is appended.
  pub fn apply(&mut self, record: BookRecord) {
    match self
      .records
      .iter_mut()
      .find(|b| b.catalog_id == record.catalog_id)
    {
      Some(slot) => *slot = record,
      None => self.records.push(record),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fakes::FakeDirectory;

  #[test]
  fn new_cache_is_loading_and_empty() {
    let cache = BookRecordCache::new();
    let snap = cache.snapshot();
    assert!(snap.loading);
    assert!(snap.records.is_empty());
    assert!(snap.error.is_none());
  }

  #[test]
  fn find_returns_first_match() {
    let mut first = BookRecord::new("A");
    first.title = Some("first".into());
    let mut second = BookRecord::new("A");
    second.title = Some("second".into());
    let cache = BookRecordCache::from_records(vec![first, second, BookRecord::new("B")]);

    assert_eq!(cache.find("A").unwrap().title.as_deref(), Some("first"));
    assert_eq!(cache.find("B").unwrap().catalog_id, "B");
  }

  #[test]
  fn find_missing_is_not_found() {
    let cache =
      BookRecordCache::from_records(vec![BookRecord::new("A"), BookRecord::new("B")]);
    assert!(matches!(cache.find("C"), Err(Error::NotFound(id)) if id == "C"));
  }

  #[tokio::test]
  async fn refresh_loads_records() {
    let dir = FakeDirectory::with_books(&["A", "B"]);
    let mut cache = BookRecordCache::new();

    let records = cache.refresh(&dir).await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(!cache.is_loading());
    assert!(cache.error().is_none());
    assert!(cache.find("B").unwrap().id.is_some());
  }

  #[tokio::test]
  async fn refresh_failure_is_stored_and_returned() {
    let dir = FakeDirectory::with_books(&["A"]);
    let mut cache = BookRecordCache::new();
    cache.refresh(&dir).await.unwrap();

    dir.go_offline();
    let err = cache.refresh(&dir).await.unwrap_err();
    assert!(matches!(err, Error::RemoteReadFailure(_)));
    assert!(matches!(cache.error(), Some(Error::RemoteReadFailure(_))));
    assert!(!cache.is_loading());
    // Previously fetched records survive the failed refresh.
    assert_eq!(cache.records().len(), 1);
  }

  #[test]
  fn apply_replaces_or_appends() {
    let mut cache = BookRecordCache::from_records(vec![BookRecord::new("A")]);

    let mut edited = BookRecord::new("A");
    edited.notes = Some("loved it".into());
    cache.apply(edited);
    assert_eq!(cache.records().len(), 1);
    assert_eq!(cache.find("A").unwrap().notes.as_deref(), Some("loved it"));

    cache.apply(BookRecord::new("Z"));
    assert_eq!(cache.records().len(), 2);
  }
}
