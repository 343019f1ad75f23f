//! Error type for `shelf-store-sqlite`.

use shelf_core::book::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] shelf_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Unknown email, or the password did not verify.
  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("an account already exists for {0}")]
  EmailTaken(String),

  #[error("book record not found: {0}")]
  RecordNotFound(RecordId),

  #[error("password hashing error: {0}")]
  PasswordHash(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
