//! The `RecordDirectory` trait — the document store behind the tracker.
//!
//! The directory holds two collections: `books` and `users`. Implemented by
//! storage backends (e.g. `shelf-store-sqlite`); the cache, the update
//! workflow, and the login flow depend on this abstraction only.

use std::future::Future;

use crate::{
  book::{BookRecord, RecordId},
  profile::UserProfile,
};

/// Abstraction over the remote record store.
///
/// All methods return `Send` futures so the trait can be shared behind an
/// `Arc` in a multi-threaded runtime.
pub trait RecordDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store a new book and return its storage id. Any `id` already on the
  /// record is ignored.
  fn add_book<'a>(
    &'a self,
    book: &'a BookRecord,
  ) -> impl Future<Output = Result<RecordId, Self::Error>> + Send + 'a;

  /// Store a new user profile and return its storage id.
  fn add_profile<'a>(
    &'a self,
    profile: &'a UserProfile,
  ) -> impl Future<Output = Result<RecordId, Self::Error>> + Send + 'a;

  /// The profile stored for `user_id`, if any.
  fn find_profile<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send + 'a;

  /// Overwrite the stored book `id` with the full contents of `book`.
  fn update_book<'a>(
    &'a self,
    id: &'a RecordId,
    book: &'a BookRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Fetch every stored book, with storage ids filled in.
  fn list_books(
    &self,
  ) -> impl Future<Output = Result<Vec<BookRecord>, Self::Error>> + Send + '_;
}
