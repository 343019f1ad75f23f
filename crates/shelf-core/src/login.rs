//! [`LoginFlow`] — sign in or register, then continue to the home screen.
//!
//! The `home` continuation is an `FnOnce`: it runs at most once, and only
//! after the session manager (and, for registration, the profile write) has
//! succeeded. Every failure comes back to the caller as an [`Error`].

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  auth::{Credentials, Session, SessionManager},
  directory::RecordDirectory,
  profile::{ProfileDefaults, UserProfile},
};

pub struct LoginFlow<S, D> {
  sessions:    Arc<S>,
  directory:   Arc<D>,
  defaults:    ProfileDefaults,
  registering: AtomicBool,
}

/// Clears the in-flight flag however the registration ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
  fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

impl<S, D> LoginFlow<S, D>
where
  S: SessionManager,
  D: RecordDirectory,
{
  pub fn new(sessions: Arc<S>, directory: Arc<D>) -> Self {
    Self {
      sessions,
      directory,
      defaults: ProfileDefaults::default(),
      registering: AtomicBool::new(false),
    }
  }

  pub fn with_profile_defaults(mut self, defaults: ProfileDefaults) -> Self {
    self.defaults = defaults;
    self
  }

  /// Whether a registration is in flight.
  pub fn is_loading(&self) -> bool { self.registering.load(Ordering::Acquire) }

  /// Sign in and run `home` on success.
  ///
  /// An account whose profile was never written (registration failed after
  /// the account was created) gets its profile here, before `home` runs.
  pub async fn sign_in<F>(&self, credentials: &Credentials, home: F) -> Result<Session>
  where
    F: FnOnce(&Session),
  {
    let session = self
      .sessions
      .sign_in(credentials)
      .await
      .map_err(|e| {
        warn!(email = credentials.email(), error = %e, "sign-in failed");
        Error::auth(e)
      })?;

    self.ensure_profile(&session).await?;

    info!(user_id = %session.user_id, "signed in");
    home(&session);
    Ok(session)
  }

  /// Register a new account, store its profile, and run `home` on success.
  ///
  /// Only one registration runs at a time; a second call while one is in
  /// flight fails with [`Error::Busy`]. If the profile write fails the
  /// account still exists; signing in later writes the missing profile.
  pub async fn register_account<F>(
    &self,
    credentials: &Credentials,
    home: F,
  ) -> Result<Session>
  where
    F: FnOnce(&Session),
  {
    if self
      .registering
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      return Err(Error::Busy);
    }
    let _in_flight = InFlight(&self.registering);

    let session = self
      .sessions
      .register_account(credentials)
      .await
      .map_err(|e| {
        warn!(email = credentials.email(), error = %e, "registration failed");
        Error::auth(e)
      })?;

    self.ensure_profile(&session).await?;

    info!(user_id = %session.user_id, "account registered");
    home(&session);
    Ok(session)
  }

  /// Return the stored profile for `session`, writing a new one first if
  /// the directory has none. The display name comes from the email the
  /// session manager reports.
  pub async fn ensure_profile(&self, session: &Session) -> Result<UserProfile> {
    let existing = self
      .directory
      .find_profile(&session.user_id)
      .await
      .map_err(|e| {
        warn!(user_id = %session.user_id, error = %e, "profile lookup failed");
        Error::remote_read(e)
      })?;
    if let Some(profile) = existing {
      return Ok(profile);
    }

    let mut profile =
      UserProfile::for_new_account(&session.user_id, &session.email, &self.defaults);
    let profile_id = self
      .directory
      .add_profile(&profile)
      .await
      .map_err(|e| {
        warn!(user_id = %session.user_id, error = %e, "profile write failed");
        Error::remote_write(e)
      })?;
    debug!(%profile_id, display_name = %profile.display_name, "profile created");

    profile.id = Some(profile_id);
    Ok(profile)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;
  use crate::fakes::{FakeDirectory, FakeSessions};

  fn flow(sessions: FakeSessions) -> (Arc<FakeDirectory>, LoginFlow<FakeSessions, FakeDirectory>) {
    let dir = Arc::new(FakeDirectory::default());
    (dir.clone(), LoginFlow::new(Arc::new(sessions), dir))
  }

  fn creds(email: &str, password: &str) -> Credentials {
    Credentials::new(email, password).unwrap()
  }

  #[tokio::test]
  async fn sign_in_runs_home_once() {
    let (_, flow) = flow(FakeSessions::with_account("me@example.com", "pw"));
    let calls = Cell::new(0);

    let session = flow
      .sign_in(&creds("me@example.com", "pw"), |_| calls.set(calls.get() + 1))
      .await
      .unwrap();

    assert_eq!(session.email, "me@example.com");
    assert_eq!(calls.get(), 1);
  }

  #[tokio::test]
  async fn failed_sign_in_never_runs_home() {
    let (_, flow) = flow(FakeSessions::with_account("me@example.com", "pw"));
    let calls = Cell::new(0);

    let err = flow
      .sign_in(&creds("me@example.com", "nope"), |_| calls.set(calls.get() + 1))
      .await
      .unwrap_err();

    assert!(matches!(err, Error::AuthFailure(_)));
    assert_eq!(calls.get(), 0);
  }

  #[tokio::test]
  async fn registration_creates_profile() {
    let (dir, flow) = flow(FakeSessions::default());
    let calls = Cell::new(0);

    let session = flow
      .register_account(&creds("me@example.com", "pw"), |_| calls.set(calls.get() + 1))
      .await
      .unwrap();

    assert_eq!(calls.get(), 1);
    assert!(!flow.is_loading());
    let profiles = dir.profiles.lock().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].display_name, "me");
    assert_eq!(profiles[0].user_id, session.user_id);
    assert!(profiles[0].id.is_some());
  }

  #[tokio::test]
  async fn registration_uses_configured_defaults() {
    let (dir, flow) = flow(FakeSessions::default());
    let flow = flow.with_profile_defaults(ProfileDefaults {
      quote:      "So many books".into(),
      profession: "Librarian".into(),
    });

    flow
      .register_account(&creds("reader@example.com", "pw"), |_| {})
      .await
      .unwrap();

    let profiles = dir.profiles.lock().unwrap();
    assert_eq!(profiles[0].quote, "So many books");
    assert_eq!(profiles[0].profession, "Librarian");
  }

  #[tokio::test]
  async fn duplicate_registration_is_auth_failure() {
    let (dir, flow) = flow(FakeSessions::with_account("me@example.com", "pw"));
    let calls = Cell::new(0);

    let err = flow
      .register_account(&creds("me@example.com", "other"), |_| calls.set(calls.get() + 1))
      .await
      .unwrap_err();

    assert!(matches!(err, Error::AuthFailure(_)));
    assert_eq!(calls.get(), 0);
    assert!(!flow.is_loading());
    assert!(dir.profiles.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn profile_write_failure_is_surfaced() {
    let (dir, flow) = flow(FakeSessions::default());
    dir.go_offline();
    let calls = Cell::new(0);

    let err = flow
      .register_account(&creds("me@example.com", "pw"), |_| calls.set(calls.get() + 1))
      .await
      .unwrap_err();

    assert!(matches!(err, Error::RemoteWriteFailure(_)));
    assert_eq!(calls.get(), 0);
    assert!(!flow.is_loading());
  }

  #[tokio::test]
  async fn failed_profile_write_is_repaired_on_sign_in() {
    let (dir, flow) = flow(FakeSessions::default());
    dir.go_offline();

    let err = flow
      .register_account(&creds("me@example.com", "pw"), |_| {})
      .await
      .unwrap_err();
    assert!(matches!(err, Error::RemoteWriteFailure(_)));
    assert!(dir.profiles.lock().unwrap().is_empty());

    dir.go_online();

    // The account exists, so registering again is refused...
    let again = flow
      .register_account(&creds("me@example.com", "pw"), |_| {})
      .await
      .unwrap_err();
    assert!(matches!(again, Error::AuthFailure(_)));

    // ...but signing in writes the missing profile before going home.
    let calls = Cell::new(0);
    let session = flow
      .sign_in(&creds("me@example.com", "pw"), |_| calls.set(calls.get() + 1))
      .await
      .unwrap();
    assert_eq!(calls.get(), 1);

    let profiles = dir.profiles.lock().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].user_id, session.user_id);
    assert_eq!(profiles[0].display_name, "me");
  }

  #[tokio::test]
  async fn sign_in_keeps_existing_profile() {
    let (dir, flow) = flow(FakeSessions::default());
    flow
      .register_account(&creds("me@example.com", "pw"), |_| {})
      .await
      .unwrap();

    flow.sign_in(&creds("me@example.com", "pw"), |_| {}).await.unwrap();
    flow.sign_in(&creds("me@example.com", "pw"), |_| {}).await.unwrap();

    assert_eq!(dir.profiles.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn ensure_profile_returns_stored_id() {
    let (dir, flow) = flow(FakeSessions::default());
    let session = Session { user_id: "uid-7".into(), email: "reader@example.com".into() };

    let created = flow.ensure_profile(&session).await.unwrap();
    let found = flow.ensure_profile(&session).await.unwrap();

    assert!(created.id.is_some());
    assert_eq!(created, found);
    assert_eq!(dir.profiles.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn registration_in_flight_is_busy() {
    let (_, flow) = flow(FakeSessions::default());
    flow.registering.store(true, Ordering::Release);

    let err = flow
      .register_account(&creds("me@example.com", "pw"), |_| {})
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Busy));
    // The rejected call must not clear the other registration's flag.
    assert!(flow.is_loading());
  }
}
