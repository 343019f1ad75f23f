//! `shelf` — command-line host for the Shelf reading tracker.
//!
//! # Usage
//!
//! ```text
//! shelf register --email me@example.com --password secret
//! shelf sign-in  --email me@example.com --password secret
//! shelf books add gb-dune --title Dune --author "Frank Herbert"
//! shelf books list
//! shelf update gb-dune --start --notes "slow start" --rating 4
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use shelf_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::ShelfConfig;

#[derive(Parser)]
#[command(name = "shelf", author, version, about = "Track what you are reading")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "shelf.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create an account and its profile, then show the home listing.
  Register(CredentialArgs),
  /// Sign in, then show the home listing.
  SignIn(CredentialArgs),
  /// Browse or add tracked books.
  #[command(subcommand)]
  Books(BooksCommand),
  /// Edit one book's reading state and commit it.
  Update(UpdateArgs),
}

#[derive(Args)]
struct CredentialArgs {
  #[arg(long)]
  email:    String,
  #[arg(long)]
  password: String,
}

#[derive(Subcommand)]
enum BooksCommand {
  /// List every tracked book.
  List,
  /// Track a book from the catalog.
  Add(AddBookArgs),
}

#[derive(Args)]
struct AddBookArgs {
  /// External catalog identifier.
  catalog_id:     String,
  #[arg(long)]
  title:          Option<String>,
  /// May be repeated; order is kept.
  #[arg(long = "author")]
  authors:        Vec<String>,
  #[arg(long = "published")]
  published_date: Option<String>,
  #[arg(long)]
  photo_url:      Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
  catalog_id: String,
  /// Replace the notes (trimmed before saving).
  #[arg(long)]
  notes:      Option<String>,
  /// Mark the book as started now.
  #[arg(long)]
  start:      bool,
  /// Mark the book as finished now.
  #[arg(long)]
  finish:     bool,
  /// Rating from 0 to 5.
  #[arg(long, allow_negative_numbers = true)]
  rating:     Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = ShelfConfig::load(&cli.config)?;

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  tracing::debug!(path = ?cfg.store_path, "store opened");

  let mut out = std::io::stdout().lock();
  match cli.command {
    Command::Register(args) => {
      commands::register(store, &cfg, &args.email, &args.password, &mut out).await
    }
    Command::SignIn(args) => {
      commands::sign_in(store, &args.email, &args.password, &mut out).await
    }
    Command::Books(BooksCommand::List) => commands::list_books(&store, &mut out).await,
    Command::Books(BooksCommand::Add(args)) => {
      let book = commands::NewBook {
        catalog_id:     args.catalog_id,
        title:          args.title,
        authors:        args.authors,
        published_date: args.published_date,
        photo_url:      args.photo_url,
      };
      commands::add_book(&store, book, &mut out).await
    }
    Command::Update(args) => {
      let edit = commands::Edit {
        notes:  args.notes,
        start:  args.start,
        finish: args.finish,
        rating: args.rating,
      };
      commands::update(store, &cfg, &args.catalog_id, edit, &mut out).await
    }
  }
}
