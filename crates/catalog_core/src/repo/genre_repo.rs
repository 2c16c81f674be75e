//! Genre repository contract and SQLite implementation.
//!
//! # Invariants
//! - Genre names are trimmed and non-blank before insert.
//! - Listing order is deterministic: `id ASC`.

use super::schema::{ensure_connection_ready, TableSpec};
use super::RepoResult;
use crate::model::book::{validate_name, Genre, GenreId};
use rusqlite::{Connection, OptionalExtension, Row};

const GENRE_TABLES: &[TableSpec] = &[("genres", &["id", "name"])];

/// Repository interface for genres.
pub trait GenreRepository {
    fn create_genre(&self, name: &str) -> RepoResult<GenreId>;
    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>>;
    fn list_genres(&self) -> RepoResult<Vec<Genre>>;
}

/// SQLite-backed genre repository.
pub struct SqliteGenreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGenreRepository<'conn> {
    /// Constructs a repository from a migrated connection or transaction.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, GENRE_TABLES)?;
        Ok(Self { conn })
    }
}

impl GenreRepository for SqliteGenreRepository<'_> {
    fn create_genre(&self, name: &str) -> RepoResult<GenreId> {
        let name = validate_name("genre", name)?;
        self.conn
            .execute("INSERT INTO genres (name) VALUES (?1);", [name.as_str()])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        let genre = self
            .conn
            .query_row(
                "SELECT id, name FROM genres WHERE id = ?1;",
                [id],
                parse_genre_row,
            )
            .optional()?;
        Ok(genre)
    }

    fn list_genres(&self) -> RepoResult<Vec<Genre>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM genres ORDER BY id ASC;")?;
        let genres = stmt
            .query_map([], parse_genre_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }
}

pub(crate) fn parse_genre_row(row: &Row<'_>) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
