//! Book, author and genre use-case service.
//!
//! # Responsibility
//! - Create catalog entries and read them back as full records.
//! - Delete books together with everything that references them.
//!
//! # Invariants
//! - Deleting a book removes its comments, its author/genre links and the
//!   book row in one unit of work; a failure at any step keeps all of them.
//! - Book creation links only existing authors/genres.

use crate::db::with_transaction;
use crate::model::book::{Author, Book, BookId, Genre, NewBook};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::book_repo::{BookLookup, BookRepository, SqliteBookRepository};
use crate::repo::comment_repo::{CommentRepository, SqliteCommentRepository};
use crate::repo::genre_repo::{GenreRepository, SqliteGenreRepository};
use crate::repo::{EntityRef, RepoError, RepoResult};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for book use-cases.
#[derive(Debug)]
pub enum BookServiceError {
    /// Target book does not exist.
    BookNotFound(BookId),
    /// Persistence-layer failure, including validation and unknown links.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent book state: {details}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityRef::Book(id)) => Self::BookNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for BookServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Outcome of deleting one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookDeletion {
    pub book_id: BookId,
    /// Comments removed together with the book.
    pub removed_comments: usize,
}

/// Catalog service facade over one SQLite connection.
pub struct BookService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> BookService<'conn> {
    /// Constructs the service from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        SqliteBookRepository::try_new(conn)?;
        SqliteCommentRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    pub fn create_author(&mut self, name: &str) -> Result<Author, BookServiceError> {
        with_transaction(self.conn, |tx| -> Result<Author, BookServiceError> {
            let authors = SqliteAuthorRepository::try_new(tx)?;
            let id = authors.create_author(name)?;
            authors
                .get_author(id)?
                .ok_or(BookServiceError::InconsistentState(
                    "created author not found in read-back",
                ))
        })
    }

    pub fn create_genre(&mut self, name: &str) -> Result<Genre, BookServiceError> {
        with_transaction(self.conn, |tx| -> Result<Genre, BookServiceError> {
            let genres = SqliteGenreRepository::try_new(tx)?;
            let id = genres.create_genre(name)?;
            genres
                .get_genre(id)?
                .ok_or(BookServiceError::InconsistentState(
                    "created genre not found in read-back",
                ))
        })
    }

    pub fn list_authors(&self) -> RepoResult<Vec<Author>> {
        SqliteAuthorRepository::try_new(self.conn)?.list_authors()
    }

    pub fn list_genres(&self) -> RepoResult<Vec<Genre>> {
        SqliteGenreRepository::try_new(self.conn)?.list_genres()
    }

    /// Creates a book with its author/genre links in one unit of work.
    ///
    /// # Errors
    /// - `Repo(Validation)` for a blank title.
    /// - `Repo(NotFound)` when any author/genre id is unknown; nothing is
    ///   written in that case.
    pub fn create_book(&mut self, book: &NewBook) -> Result<Book, BookServiceError> {
        let created = with_transaction(self.conn, |tx| -> Result<Book, BookServiceError> {
            let books = SqliteBookRepository::try_new(tx)?;
            let id = books.create_book(book)?;
            books
                .get_by_id(id)?
                .ok_or(BookServiceError::InconsistentState(
                    "created book not found in read-back",
                ))
        })?;

        info!(
            "event=book_create module=service status=ok book_id={} authors={} genres={}",
            created.id,
            created.authors.len(),
            created.genres.len()
        );
        Ok(created)
    }

    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        SqliteBookRepository::try_new(self.conn)?.get_by_id(id)
    }

    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        SqliteBookRepository::try_new(self.conn)?.list_books()
    }

    /// Replaces the title of an existing book.
    pub fn rename_book(&mut self, id: BookId, title: &str) -> Result<Book, BookServiceError> {
        with_transaction(self.conn, |tx| -> Result<Book, BookServiceError> {
            let books = SqliteBookRepository::try_new(tx)?;
            books.update_title(id, title)?;
            books
                .get_by_id(id)?
                .ok_or(BookServiceError::InconsistentState(
                    "renamed book not found in read-back",
                ))
        })
    }

    /// Deletes a book and every comment that belongs to it.
    ///
    /// Comments go first, then links and the book row, all in one unit of
    /// work.
    pub fn delete_book(&mut self, id: BookId) -> Result<BookDeletion, BookServiceError> {
        let deletion = with_transaction(
            self.conn,
            |tx| -> Result<BookDeletion, BookServiceError> {
                let books = SqliteBookRepository::try_new(tx)?;
                if books.get_by_id(id)?.is_none() {
                    return Err(BookServiceError::BookNotFound(id));
                }

                let comments = SqliteCommentRepository::try_new(tx)?;
                let removed_comments = comments.delete_comments_for_book(id)?;
                if !books.delete_book_row(id)? {
                    return Err(BookServiceError::InconsistentState(
                        "book vanished during delete",
                    ));
                }

                Ok(BookDeletion {
                    book_id: id,
                    removed_comments,
                })
            },
        )?;

        info!(
            "event=book_delete module=service status=ok book_id={} removed_comments={}",
            deletion.book_id, deletion.removed_comments
        );
        Ok(deletion)
    }
}
