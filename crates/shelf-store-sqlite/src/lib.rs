//! SQLite backend for the Shelf reading tracker.
//!
//! [`SqliteStore`] plays both collaborator roles: it is the record directory
//! (books and user profiles) and the session manager (accounts with argon2
//! password hashes). All database access goes through [`tokio_rusqlite`] so
//! it runs on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
