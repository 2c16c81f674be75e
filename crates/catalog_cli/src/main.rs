//! Command-line front end for the catalog database.
//!
//! Configuration via environment:
//! - CATALOG_DB: SQLite file path (default: catalog.sqlite3)
//! - CATALOG_LOG_LEVEL: trace|debug|info|warn|error
//! - CATALOG_LOG_DIR: absolute directory for rolling logs (logging off when unset)

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{AuthorCommand, BookCommand, CommentCommand, GenreCommand};

/// Library catalog CLI. Prints JSON on stdout.
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Catalog database file
    #[arg(long, env = "CATALOG_DB", default_value = "catalog.sqlite3", global = true)]
    db: PathBuf,

    /// Log level (defaults to debug in debug builds, info otherwise)
    #[arg(long, env = "CATALOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files
    #[arg(long, env = "CATALOG_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authors
    #[command(subcommand)]
    Author(AuthorCommand),

    /// Manage genres
    #[command(subcommand)]
    Genre(GenreCommand),

    /// Manage books
    #[command(subcommand)]
    Book(BookCommand),

    /// Add or remove book comments
    #[command(subcommand)]
    Comment(CommentCommand),
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(catalog_core::default_log_level());
        catalog_core::init_logging(level, log_dir)?;
    }

    let mut conn = catalog_core::db::open_db(&cli.db)?;
    log::debug!("event=cli_start module=cli status=ok db={}", cli.db.display());

    match cli.command {
        Commands::Author(command) => commands::author(&mut conn, command),
        Commands::Genre(command) => commands::genre(&mut conn, command),
        Commands::Book(command) => commands::book(&mut conn, command),
        Commands::Comment(command) => commands::comment(&mut conn, command),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Cli};
    use catalog_core::db::open_db;
    use catalog_core::{BookService, CommentService, CommentServiceError};
    use clap::Parser;
    use std::path::Path;

    fn run_args(db: &Path, args: &[&str]) -> anyhow::Result<()> {
        let db = db.to_str().unwrap();
        let head = ["catalog", "--db", db];
        let argv = head.iter().chain(args).copied();
        run(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn book_comment_round_trip_through_subcommands() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("catalog.sqlite3");

        run_args(&db, &["book", "add", "Foo"]).unwrap();
        run_args(&db, &["comment", "add", "1", "nice book"]).unwrap();
        {
            let mut conn = open_db(&db).unwrap();
            let service = CommentService::try_new(&mut conn).unwrap();
            let comments = service.list_comments(1).unwrap();
            assert_eq!(comments.len(), 1);
            assert_eq!(comments[0].comment, "nice book");
        }

        run_args(&db, &["comment", "remove", "1"]).unwrap();
        run_args(&db, &["book", "show", "1"]).unwrap();

        let mut conn = open_db(&db).unwrap();
        let service = CommentService::try_new(&mut conn).unwrap();
        assert!(service.list_comments(1).unwrap().is_empty());
        drop(service);
        let books = BookService::try_new(&mut conn).unwrap();
        assert_eq!(books.get_book(1).unwrap().unwrap().title, "Foo");
    }

    #[test]
    fn comment_on_unknown_book_fails_with_book_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("catalog.sqlite3");

        let err = run_args(&db, &["comment", "add", "999", "lost"]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CommentServiceError>(),
            Some(CommentServiceError::BookNotFound(999))
        ));
        assert!(run_args(&db, &["book", "show", "999"]).is_err());
    }

    #[test]
    fn missing_subcommand_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["catalog", "--db", "unused.sqlite3"]).is_err());
    }
}
