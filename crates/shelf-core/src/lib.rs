//! Core types and trait definitions for the Shelf reading tracker.
//!
//! This crate holds the reading-state model, the record cache, and the two
//! flows a host drives: signing in (or registering) and editing one book's
//! reading state. It is free of database dependencies; backends plug in
//! through the [`directory::RecordDirectory`] and [`auth::SessionManager`]
//! traits.

pub mod auth;
pub mod book;
pub mod cache;
pub mod directory;
pub mod error;
pub mod login;
pub mod profile;
pub mod workflow;

pub use error::{Error, Milestone, Result};

#[cfg(test)]
pub(crate) mod fakes;
