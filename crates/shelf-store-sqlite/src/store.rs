//! [`SqliteStore`] — the SQLite implementation of [`RecordDirectory`] and
//! [`SessionManager`].

use std::path::Path;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use shelf_core::{
  auth::{Credentials, Session, SessionManager},
  book::{BookRecord, RecordId},
  directory::RecordDirectory,
  profile::UserProfile,
};

use crate::{
  Error, Result,
  encode::{BookColumns, RawBook, encode_dt, normalize_email},
  schema::SCHEMA,
};

const BOOK_COLUMNS: &str = "record_id, catalog_id, title, authors, published_date, \
   photo_url, notes, started_reading_at, finished_reading_at, rating";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shelf store backed by a single SQLite file.
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

  /// All stored profiles for `user_id`. Registration writes exactly one.
  pub async fn profiles_for(&self, user_id: &str) -> Result<Vec<UserProfile>> {
    let user_id = user_id.to_string();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT profile_id, user_id, display_name, avatar_url, quote, profession
           FROM users WHERE user_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], |row| {
            Ok(UserProfile {
              id:           Some(RecordId::new(row.get::<_, String>(0)?)),
              user_id:      row.get(1)?,
              display_name: row.get(2)?,
              avatar_url:   row.get(3)?,
              quote:        row.get(4)?,
              profession:   row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(|e| Error::PasswordHash(e.to_string()))
  }
}

// ─── RecordDirectory impl ────────────────────────────────────────────────────

impl RecordDirectory for SqliteStore {
  type Error = Error;

  async fn add_book(&self, book: &BookRecord) -> Result<RecordId> {
    let record_id = Uuid::new_v4().hyphenated().to_string();
    let cols = BookColumns::from_book(book)?;
    let id_str = record_id.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO books (
             record_id, catalog_id, title, authors, published_date,
             photo_url, notes, started_reading_at, finished_reading_at, rating
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            cols.catalog_id,
            cols.title,
            cols.authors,
            cols.published_date,
            cols.photo_url,
            cols.notes,
            cols.started_reading_at,
            cols.finished_reading_at,
            cols.rating,
          ],
        )?;
        Ok(())
      })
      .await?;

    debug!(%record_id, catalog_id = %book.catalog_id, "book added");
    Ok(RecordId::new(record_id))
  }

  async fn add_profile(&self, profile: &UserProfile) -> Result<RecordId> {
    let profile_id = Uuid::new_v4().hyphenated().to_string();
    let id_str = profile_id.clone();
    let p = profile.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (profile_id, user_id, display_name, avatar_url, quote, profession)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            p.user_id,
            p.display_name,
            p.avatar_url,
            p.quote,
            p.profession,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(RecordId::new(profile_id))
  }

  async fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
    Ok(self.profiles_for(user_id).await?.into_iter().next())
  }

  async fn update_book(&self, id: &RecordId, book: &BookRecord) -> Result<()> {
    let cols = BookColumns::from_book(book)?;
    let id_str = id.as_str().to_string();

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE books SET
             catalog_id = ?2, title = ?3, authors = ?4, published_date = ?5,
             photo_url = ?6, notes = ?7, started_reading_at = ?8,
             finished_reading_at = ?9, rating = ?10
           WHERE record_id = ?1",
          rusqlite::params![
            id_str,
            cols.catalog_id,
            cols.title,
            cols.authors,
            cols.published_date,
            cols.photo_url,
            cols.notes,
            cols.started_reading_at,
            cols.finished_reading_at,
            cols.rating,
          ],
        )?;
        Ok(n)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RecordNotFound(id.clone()));
    }
    Ok(())
  }

  async fn list_books(&self) -> Result<Vec<BookRecord>> {
    let raws: Vec<RawBook> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawBook::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBook::into_book).collect()
  }
}

// ─── SessionManager impl ─────────────────────────────────────────────────────

impl SessionManager for SqliteStore {
  type Error = Error;

  async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
    let email = normalize_email(credentials.email());
    let lookup = email.clone();

    let row: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, password_hash FROM accounts WHERE email = ?1",
            rusqlite::params![lookup],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?)
      })
      .await?;

    let (user_id, hash) = row.ok_or(Error::InvalidCredentials)?;
    let parsed = PasswordHash::new(&hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Argon2::default()
      .verify_password(credentials.password().as_bytes(), &parsed)
      .map_err(|_| Error::InvalidCredentials)?;

    Ok(Session { user_id, email })
  }

  async fn register_account(&self, credentials: &Credentials) -> Result<Session> {
    let email = normalize_email(credentials.email());
    let hash = Self::hash_password(credentials.password())?;
    let user_id = Uuid::new_v4().hyphenated().to_string();

    let (email_c, user_id_c) = (email.clone(), user_id.clone());
    let created_at = encode_dt(Utc::now());

    let inserted = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM accounts WHERE email = ?1",
            rusqlite::params![email_c],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO accounts (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![user_id_c, email_c, hash, created_at],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::EmailTaken(email));
    }

    debug!(%user_id, "account created");
    Ok(Session { user_id, email })
  }
}
