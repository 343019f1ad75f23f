//! In-memory collaborators for exercising the flows without a backend.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use thiserror::Error;

use crate::{
  auth::{Credentials, Session, SessionManager},
  book::{BookRecord, RecordId},
  directory::RecordDirectory,
  profile::UserProfile,
};

#[derive(Debug, Error)]
pub enum FakeError {
  #[error("invalid credentials")]
  InvalidCredentials,
  #[error("email already registered")]
  EmailTaken,
  #[error("no record {0}")]
  Missing(RecordId),
  #[error("backend offline")]
  Offline,
}

// ─── Directory ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeDirectory {
  pub books:    Mutex<Vec<BookRecord>>,
  pub profiles: Mutex<Vec<UserProfile>>,
  pub updates:  AtomicUsize,
  pub offline:  AtomicBool,
  next_id:      AtomicUsize,
}

impl FakeDirectory {
  /// A directory pre-populated with one stored book per catalog id.
  pub fn with_books(catalog_ids: &[&str]) -> Self {
    let dir = Self::default();
    {
      let mut books = dir.books.lock().unwrap();
      for cid in catalog_ids {
        let mut book = BookRecord::new(*cid);
        book.id = Some(dir.mint_id());
        book.title = Some(format!("Title {cid}"));
        books.push(book);
      }
    }
    dir
  }

  pub fn go_offline(&self) { self.offline.store(true, Ordering::SeqCst); }

  pub fn go_online(&self) { self.offline.store(false, Ordering::SeqCst); }

  pub fn stored(&self, id: &RecordId) -> Option<BookRecord> {
    self
      .books
      .lock()
      .unwrap()
      .iter()
      .find(|b| b.id.as_ref() == Some(id))
      .cloned()
  }

  fn mint_id(&self) -> RecordId {
    RecordId::new(format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
  }

  fn check_online(&self) -> Result<(), FakeError> {
    if self.offline.load(Ordering::SeqCst) {
      Err(FakeError::Offline)
    } else {
      Ok(())
    }
  }
}

impl RecordDirectory for FakeDirectory {
  type Error = FakeError;

  async fn add_book(&self, book: &BookRecord) -> Result<RecordId, FakeError> {
    self.check_online()?;
    let id = self.mint_id();
    let mut stored = book.clone();
    stored.id = Some(id.clone());
    self.books.lock().unwrap().push(stored);
    Ok(id)
  }

  async fn add_profile(&self, profile: &UserProfile) -> Result<RecordId, FakeError> {
    self.check_online()?;
    let id = self.mint_id();
    let mut stored = profile.clone();
    stored.id = Some(id.clone());
    self.profiles.lock().unwrap().push(stored);
    Ok(id)
  }

  async fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>, FakeError> {
    self.check_online()?;
    Ok(
      self
        .profiles
        .lock()
        .unwrap()
        .iter()
        .find(|p| p.user_id == user_id)
        .cloned(),
    )
  }

  async fn update_book(&self, id: &RecordId, book: &BookRecord) -> Result<(), FakeError> {
    self.check_online()?;
    let mut books = self.books.lock().unwrap();
    let slot = books
      .iter_mut()
      .find(|b| b.id.as_ref() == Some(id))
      .ok_or_else(|| FakeError::Missing(id.clone()))?;
    *slot = BookRecord { id: Some(id.clone()), ..book.clone() };
    self.updates.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn list_books(&self) -> Result<Vec<BookRecord>, FakeError> {
    self.check_online()?;
    Ok(self.books.lock().unwrap().clone())
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSessions {
  /// email → (password, user id)
  accounts: Mutex<HashMap<String, (String, String)>>,
}

impl FakeSessions {
  pub fn with_account(email: &str, password: &str) -> Self {
    let sessions = Self::default();
    sessions
      .accounts
      .lock()
      .unwrap()
      .insert(email.to_string(), (password.to_string(), format!("uid-{email}")));
    sessions
  }
}

impl SessionManager for FakeSessions {
  type Error = FakeError;

  async fn sign_in(&self, credentials: &Credentials) -> Result<Session, FakeError> {
    let accounts = self.accounts.lock().unwrap();
    match accounts.get(credentials.email()) {
      Some((pw, uid)) if pw == credentials.password() => Ok(Session {
        user_id: uid.clone(),
        email:   credentials.email().to_string(),
      }),
      _ => Err(FakeError::InvalidCredentials),
    }
  }

  async fn register_account(&self, credentials: &Credentials) -> Result<Session, FakeError> {
    let mut accounts = self.accounts.lock().unwrap();
    if accounts.contains_key(credentials.email()) {
      return Err(FakeError::EmailTaken);
    }
    let uid = format!("uid-{}", credentials.email());
    accounts.insert(
      credentials.email().to_string(),
      (credentials.password().to_string(), uid.clone()),
    );
    Ok(Session { user_id: uid, email: credentials.email().to_string() })
  }
}
