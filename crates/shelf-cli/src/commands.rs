//! Command handlers. Each one drives a `shelf-core` flow against the store
//! and writes its results to `out`.

use std::{io::Write, sync::Arc};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use shelf_core::{
  auth::{Credentials, Session},
  book::{BookRecord, ReadingStatus},
  cache::BookRecordCache,
  directory::RecordDirectory,
  login::LoginFlow,
  workflow::UpdateWorkflow,
};
use shelf_store_sqlite::SqliteStore;

use crate::config::ShelfConfig;

/// Display data for a book being added from the catalog.
pub struct NewBook {
  pub catalog_id:     String,
  pub title:          Option<String>,
  pub authors:        Vec<String>,
  pub published_date: Option<String>,
  pub photo_url:      Option<String>,
}

/// Requested edits for `shelf update`.
#[derive(Default)]
pub struct Edit {
  pub notes:  Option<String>,
  pub start:  bool,
  pub finish: bool,
  pub rating: Option<i64>,
}

// ─── Accounts ────────────────────────────────────────────────────────────────

pub async fn register(
  store: SqliteStore,
  cfg: &ShelfConfig,
  email: &str,
  password: &str,
  out: &mut impl Write,
) -> Result<()> {
  let credentials = Credentials::new(email, password)?;
  let store = Arc::new(store);
  let flow =
    LoginFlow::new(store.clone(), store.clone()).with_profile_defaults(cfg.profile.clone());

  let mut home: Option<Session> = None;
  flow
    .register_account(&credentials, |s| home = Some(s.clone()))
    .await
    .context("registration failed")?;

  if let Some(session) = home {
    for profile in store.profiles_for(&session.user_id).await? {
      writeln!(out, "Welcome, {} ({})", profile.display_name, profile.profession)?;
    }
    show_home(store.as_ref(), out).await?;
  }
  Ok(())
}

pub async fn sign_in(
  store: SqliteStore,
  email: &str,
  password: &str,
  out: &mut impl Write,
) -> Result<()> {
  let credentials = Credentials::new(email, password)?;
  let store = Arc::new(store);
  let flow = LoginFlow::new(store.clone(), store.clone());

  let mut home: Option<Session> = None;
  flow
    .sign_in(&credentials, |s| home = Some(s.clone()))
    .await
    .context("sign-in failed")?;

  if let Some(session) = home {
    writeln!(out, "Signed in as {}", session.email)?;
    show_home(store.as_ref(), out).await?;
  }
  Ok(())
}

// ─── Books ───────────────────────────────────────────────────────────────────

pub async fn list_books(store: &SqliteStore, out: &mut impl Write) -> Result<()> {
  show_home(store, out).await
}

pub async fn add_book(store: &SqliteStore, book: NewBook, out: &mut impl Write) -> Result<()> {
  let mut record = BookRecord::new(book.catalog_id);
  record.title = book.title;
  record.authors = book.authors;
  record.published_date = book.published_date;
  record.photo_url = book.photo_url;

  let id = store
    .add_book(&record)
    .await
    .context("failed to add book")?;
  writeln!(out, "Added {} as {id}", record.catalog_id)?;
  Ok(())
}

/// Run one update workflow: load, apply every requested edit, commit.
pub async fn update(
  store: SqliteStore,
  cfg: &ShelfConfig,
  catalog_id: &str,
  edit: Edit,
  out: &mut impl Write,
) -> Result<()> {
  let store = Arc::new(store);
  let mut cache = BookRecordCache::new();
  cache.refresh(store.as_ref()).await?;

  let mut wf =
    UpdateWorkflow::load_for_editing(store.clone(), &cache, catalog_id)?.with_options(cfg.workflow);

  if let Some(notes) = edit.notes {
    wf.set_notes(notes);
  }
  if edit.start {
    wf.mark_started()?;
  }
  if edit.finish {
    wf.mark_finished()?;
  }
  if let Some(rating) = edit.rating {
    wf.set_rating(rating)?;
  }

  let committed = wf.commit().await?;
  cache.apply(committed);

  let book = cache.find(catalog_id)?;
  write_book(book, out)?;
  writeln!(out, "  notes:    {}", book.notes_or_placeholder())?;
  writeln!(out, "  started:  {}", fmt_date(book.started_reading_at))?;
  writeln!(out, "  finished: {}", fmt_date(book.finished_reading_at))?;
  Ok(())
}

// ─── Rendering ───────────────────────────────────────────────────────────────

async fn show_home<D>(directory: &D, out: &mut impl Write) -> Result<()>
where
  D: RecordDirectory,
{
  let mut cache = BookRecordCache::new();
  let records = cache.refresh(directory).await?;
  if records.is_empty() {
    writeln!(out, "No books tracked yet.")?;
  }
  for book in records {
    write_book(book, out)?;
  }
  Ok(())
}

fn write_book(book: &BookRecord, out: &mut impl Write) -> Result<()> {
  let status = match book.reading_status() {
    ReadingStatus::NotStarted => "not started",
    ReadingStatus::Reading => "reading",
    ReadingStatus::Finished => "finished",
  };
  let rating = book
    .rating
    .map(|r| r.to_string())
    .unwrap_or_else(|| "-".into());
  writeln!(
    out,
    "{:<16} {:<12} {:<5} {} by {}",
    book.catalog_id,
    status,
    rating,
    book.title.as_deref().unwrap_or("(untitled)"),
    if book.authors.is_empty() { "unknown".to_string() } else { book.authors.join(", ") },
  )?;
  Ok(())
}

fn fmt_date(at: Option<DateTime<Utc>>) -> String {
  at.map(|d| d.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| "-".into())
}
