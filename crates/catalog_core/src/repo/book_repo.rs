//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Resolve books by id for collaborators (`BookLookup`).
//! - Persist books together with their author/genre link rows.
//!
//! # Invariants
//! - Author/genre links reference existing rows; unknown ids are rejected
//!   with `NotFound` before any link is written.
//! - Book rows are deleted only after their link rows. Comments are not
//!   touched here: the `book_comments` foreign key rejects deleting a book
//!   that still has comments, so callers must remove them first.

use super::author_repo::parse_author_row;
use super::genre_repo::parse_genre_row;
use super::schema::{ensure_connection_ready, TableSpec};
use super::{EntityRef, RepoError, RepoResult};
use crate::model::book::{validate_title, Author, AuthorId, Book, BookId, Genre, GenreId, NewBook};
use rusqlite::{params, Connection, OptionalExtension};

const BOOK_TABLES: &[TableSpec] = &[
    ("books", &["id", "title"]),
    ("authors", &["id", "name"]),
    ("genres", &["id", "name"]),
    ("book_authors", &["book_id", "author_id"]),
    ("book_genres", &["book_id", "genre_id"]),
];

/// Read-only collaborator used to resolve the owning book of a comment.
pub trait BookLookup {
    /// Returns `None` when the book does not exist. Absence is not an error.
    fn get_by_id(&self, id: BookId) -> RepoResult<Option<Book>>;
}

/// Repository interface for book persistence.
pub trait BookRepository: BookLookup {
    /// Inserts the book and its author/genre links, returning the new id.
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId>;
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn update_title(&self, id: BookId, title: &str) -> RepoResult<()>;
    /// Deletes link rows and the book row. Returns `false` for unknown ids.
    fn delete_book_row(&self, id: BookId) -> RepoResult<bool>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated connection or transaction.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, BOOK_TABLES)?;
        Ok(Self { conn })
    }

    fn load_authors(&self, book_id: BookId) -> RepoResult<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name
             FROM book_authors ba
             INNER JOIN authors a ON a.id = ba.author_id
             WHERE ba.book_id = ?1
             ORDER BY a.id ASC;",
        )?;
        let authors = stmt
            .query_map([book_id], parse_author_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn load_genres(&self, book_id: BookId) -> RepoResult<Vec<Genre>> {
        let mut stmt = self.conn.prepare(
            "SELECT g.id, g.name
             FROM book_genres bg
             INNER JOIN genres g ON g.id = bg.genre_id
             WHERE bg.book_id = ?1
             ORDER BY g.id ASC;",
        )?;
        let genres = stmt
            .query_map([book_id], parse_genre_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn assemble(&self, id: BookId, title: String) -> RepoResult<Book> {
        Ok(Book {
            id,
            title,
            authors: self.load_authors(id)?,
            genres: self.load_genres(id)?,
        })
    }

    fn row_exists(&self, table: &str, id: i64) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn ensure_links_exist(&self, author_ids: &[AuthorId], genre_ids: &[GenreId]) -> RepoResult<()> {
        for &author_id in author_ids {
            if !self.row_exists("authors", author_id)? {
                return Err(RepoError::NotFound(EntityRef::Author(author_id)));
            }
        }
        for &genre_id in genre_ids {
            if !self.row_exists("genres", genre_id)? {
                return Err(RepoError::NotFound(EntityRef::Genre(genre_id)));
            }
        }
        Ok(())
    }
}

impl BookLookup for SqliteBookRepository<'_> {
    fn get_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        let title = self
            .conn
            .query_row("SELECT title FROM books WHERE id = ?1;", [id], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        match title {
            Some(title) => Ok(Some(self.assemble(id, title)?)),
            None => Ok(None),
        }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId> {
        let book = book.validated()?;
        self.ensure_links_exist(&book.author_ids, &book.genre_ids)?;

        self.conn.execute(
            "INSERT INTO books (title) VALUES (?1);",
            [book.title.as_str()],
        )?;
        let book_id = self.conn.last_insert_rowid();

        for author_id in &book.author_ids {
            self.conn.execute(
                "INSERT INTO book_authors (book_id, author_id) VALUES (?1, ?2);",
                params![book_id, author_id],
            )?;
        }
        for genre_id in &book.genre_ids {
            self.conn.execute(
                "INSERT INTO book_genres (book_id, genre_id) VALUES (?1, ?2);",
                params![book_id, genre_id],
            )?;
        }

        Ok(book_id)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM books ORDER BY id ASC;")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, BookId>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title)| self.assemble(id, title))
            .collect()
    }

    fn update_title(&self, id: BookId, title: &str) -> RepoResult<()> {
        let title = validate_title(title)?;
        let changed = self.conn.execute(
            "UPDATE books SET title = ?1 WHERE id = ?2;",
            params![title, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Book(id)));
        }

        Ok(())
    }

    fn delete_book_row(&self, id: BookId) -> RepoResult<bool> {
        self.conn
            .execute("DELETE FROM book_authors WHERE book_id = ?1;", [id])?;
        self.conn
            .execute("DELETE FROM book_genres WHERE book_id = ?1;", [id])?;
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}
