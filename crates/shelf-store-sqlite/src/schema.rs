//! SQL schema for the Shelf SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Sign-in identities. Emails are stored trimmed and lowercased.
CREATE TABLE IF NOT EXISTS accounts (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- The `users` collection: one profile per registered account.
CREATE TABLE IF NOT EXISTS users (
    profile_id   TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    display_name TEXT NOT NULL,
    avatar_url   TEXT NOT NULL DEFAULT '',
    quote        TEXT NOT NULL,
    profession   TEXT NOT NULL
);

-- The `books` collection. catalog_id is not unique across catalog sources.
CREATE TABLE IF NOT EXISTS books (
    record_id           TEXT PRIMARY KEY,
    catalog_id          TEXT NOT NULL,
    title               TEXT,
    authors             TEXT NOT NULL DEFAULT '[]',   -- JSON array
    published_date      TEXT,
    photo_url           TEXT,
    notes               TEXT,
    started_reading_at  TEXT,                         -- RFC 3339 UTC
    finished_reading_at TEXT,                         -- RFC 3339 UTC
    rating              INTEGER CHECK (rating BETWEEN 0 AND 5)
);

CREATE INDEX IF NOT EXISTS books_catalog_idx ON books(catalog_id);
CREATE INDEX IF NOT EXISTS users_user_idx    ON users(user_id);

PRAGMA user_version = 1;
";
