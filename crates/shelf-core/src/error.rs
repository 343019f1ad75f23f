//! Error types for `shelf-core`.

use std::{fmt, sync::Arc};

use thiserror::Error;

/// A collaborator error, shared so that [`Error`] can be cloned into the
/// record cache's error slot and still be returned to the caller.
pub type SourceError = Arc<dyn std::error::Error + Send + Sync>;

/// The reading milestones a record can be marked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
  Started,
  Finished,
}

impl fmt::Display for Milestone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Started => f.write_str("started"),
      Self::Finished => f.write_str("finished"),
    }
  }
}

#[derive(Debug, Clone, Error)]
pub enum Error {
  /// Bad credentials, or the account could not be registered.
  #[error("authentication failed: {0}")]
  AuthFailure(#[source] SourceError),

  #[error("no book with catalog id {0:?}")]
  NotFound(String),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// The directory rejected a write, or could not be reached.
  #[error("remote write failed: {0}")]
  RemoteWriteFailure(#[source] SourceError),

  #[error("remote read failed: {0}")]
  RemoteReadFailure(#[source] SourceError),

  #[error("book is already marked as {0}")]
  AlreadyMarked(Milestone),

  /// The record has no storage id, so there is nothing to update.
  #[error("book {0:?} has not been persisted")]
  NotPersisted(String),

  #[error("another request is already in flight")]
  Busy,
}

impl Error {
  pub(crate) fn auth<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::AuthFailure(Arc::new(e))
  }

  pub(crate) fn remote_write<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::RemoteWriteFailure(Arc::new(e))
  }

  pub(crate) fn remote_read<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::RemoteReadFailure(Arc::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
