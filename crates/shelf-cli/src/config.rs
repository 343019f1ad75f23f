//! Runtime configuration, layered from an optional TOML file and `SHELF_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use shelf_core::{profile::ProfileDefaults, workflow::WorkflowOptions};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
  /// SQLite database file; `~/` is expanded.
  pub store_path: PathBuf,
  pub workflow:   WorkflowOptions,
  /// Values written into new profiles at registration.
  pub profile:    ProfileDefaults,
}

impl Default for ShelfConfig {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("~/.local/share/shelf/shelf.db"),
      workflow:   WorkflowOptions::default(),
      profile:    ProfileDefaults::default(),
    }
  }
}

impl ShelfConfig {
  /// Read `path` (if it exists) and overlay the environment, e.g.
  /// `SHELF_STORE_PATH` or `SHELF_WORKFLOW__REQUIRE_STARTED_BEFORE_FINISHED`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("SHELF")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ShelfConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
