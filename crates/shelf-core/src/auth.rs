//! The `SessionManager` trait and the credential types it accepts.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Credentials ─────────────────────────────────────────────────────────────

/// An email/password pair, trimmed and known to be non-empty.
#[derive(Clone)]
pub struct Credentials {
  email:    String,
  password: String,
}

impl Credentials {
  /// Trim both fields and reject the pair if either ends up empty.
  pub fn new(email: &str, password: &str) -> Result<Self> {
    let email = email.trim();
    let password = password.trim();
    if email.is_empty() {
      return Err(Error::InvalidInput("email must not be empty".into()));
    }
    if password.is_empty() {
      return Err(Error::InvalidInput("password must not be empty".into()));
    }
    Ok(Self { email: email.to_string(), password: password.to_string() })
  }

  pub fn email(&self) -> &str { &self.email }

  pub fn password(&self) -> &str { &self.password }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("email", &self.email)
      .field("password", &"<redacted>")
      .finish()
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// An authenticated user, as reported by the session manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub user_id: String,
  pub email:   String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the credential/session service.
///
/// Each call resolves exactly once with a success or a failure; there are no
/// completion listeners.
pub trait SessionManager: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Authenticate an existing account.
  fn sign_in<'a>(
    &'a self,
    credentials: &'a Credentials,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// Create a new account and sign it in. Fails if the email is taken.
  fn register_account<'a>(
    &'a self,
    credentials: &'a Credentials,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;
}
