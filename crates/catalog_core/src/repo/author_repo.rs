//! Author repository contract and SQLite implementation.
//!
//! # Invariants
//! - Author names are trimmed and non-blank before insert.
//! - Listing order is deterministic: `id ASC`.

use super::schema::{ensure_connection_ready, TableSpec};
use super::RepoResult;
use crate::model::book::{validate_name, Author, AuthorId};
use rusqlite::{Connection, OptionalExtension, Row};

const AUTHOR_TABLES: &[TableSpec] = &[("authors", &["id", "name"])];

/// Repository interface for authors.
pub trait AuthorRepository {
    fn create_author(&self, name: &str) -> RepoResult<AuthorId>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self) -> RepoResult<Vec<Author>>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection or transaction.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, AUTHOR_TABLES)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, name: &str) -> RepoResult<AuthorId> {
        let name = validate_name("author", name)?;
        self.conn
            .execute("INSERT INTO authors (name) VALUES (?1);", [name.as_str()])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                "SELECT id, name FROM authors WHERE id = ?1;",
                [id],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn list_authors(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM authors ORDER BY id ASC;")?;
        let authors = stmt
            .query_map([], parse_author_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }
}

pub(crate) fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
