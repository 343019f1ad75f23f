//! User profiles, written once when an account is registered.

use serde::{Deserialize, Serialize};

use crate::book::RecordId;

/// Fixed values a new profile starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
  pub quote:      String,
  pub profession: String,
}

impl Default for ProfileDefaults {
  fn default() -> Self {
    Self {
      quote:      "Life is great".to_string(),
      profession: "Android Developer".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  /// `None` until the directory has stored the profile.
  pub id:           Option<RecordId>,
  /// Opaque id issued by the session manager.
  pub user_id:      String,
  pub display_name: String,
  pub avatar_url:   String,
  pub quote:        String,
  pub profession:   String,
}

impl UserProfile {
  /// Build the profile for a freshly registered account. The display name is
  /// the local part of the email address.
  pub fn for_new_account(
    user_id: impl Into<String>,
    email: &str,
    defaults: &ProfileDefaults,
  ) -> Self {
    Self {
      id:           None,
      user_id:      user_id.into(),
      display_name: display_name_from_email(email).to_string(),
      avatar_url:   String::new(),
      quote:        defaults.quote.clone(),
      profession:   defaults.profession.clone(),
    }
  }
}

/// `"me@example.com"` becomes `"me"`. An address without `@` is used whole.
pub fn display_name_from_email(email: &str) -> &str {
  email.split_once('@').map_or(email, |(local, _)| local)
}
