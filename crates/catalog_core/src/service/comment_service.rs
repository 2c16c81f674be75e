//! Comment use-case service.
//!
//! # Responsibility
//! - Add comments to existing books and remove comments by id.
//! - Run every mutation in exactly one unit of work.
//!
//! # Invariants
//! - A comment is only created after its owning book resolved through
//!   `BookLookup`; unknown books create nothing.
//! - Removing an unknown comment id is a successful no-op.
//! - Comment text never reaches the logs.

use crate::db::with_transaction;
use crate::model::book::BookId;
use crate::model::comment::{BookComment, CommentId};
use crate::repo::book_repo::{BookLookup, SqliteBookRepository};
use crate::repo::comment_repo::{CommentRepository, SqliteCommentRepository};
use crate::repo::{RepoError, RepoResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for comment use-cases.
#[derive(Debug)]
pub enum CommentServiceError {
    /// The referenced book does not exist. Caller input is invalid; retrying
    /// with the same id cannot succeed.
    BookNotFound(BookId),
    /// Persistence-layer failure, propagated unchanged.
    Repo(RepoError),
}

impl CommentServiceError {
    /// True for errors caused by caller-supplied arguments.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::BookNotFound(_))
    }
}

impl Display for CommentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::BookNotFound(_) => None,
        }
    }
}

impl From<RepoError> for CommentServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for CommentServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Comment data-access component over one SQLite connection.
pub struct CommentService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> CommentService<'conn> {
    /// Constructs the service from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        SqliteBookRepository::try_new(conn)?;
        SqliteCommentRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Adds a comment to an existing book and returns its store-assigned id.
    ///
    /// # Errors
    /// - `BookNotFound` when `book_id` does not resolve; nothing is written.
    /// - `Repo` for any storage failure; the unit of work is rolled back.
    pub fn add_comment(
        &mut self,
        book_id: BookId,
        text: &str,
    ) -> Result<CommentId, CommentServiceError> {
        let result = with_transaction(
            self.conn,
            |tx| -> Result<CommentId, CommentServiceError> {
                let books = SqliteBookRepository::try_new(tx)?;
                let comments = SqliteCommentRepository::try_new(tx)?;
                add_comment_with(&books, &comments, book_id, text)
            },
        );

        match &result {
            Ok(comment_id) => info!(
                "event=comment_add module=service status=ok book_id={book_id} comment_id={comment_id} text_len={}",
                text.len()
            ),
            Err(CommentServiceError::BookNotFound(_)) => info!(
                "event=comment_add module=service status=rejected book_id={book_id} error_code=book_not_found"
            ),
            Err(err) => error!(
                "event=comment_add module=service status=error book_id={book_id} error={err}"
            ),
        }
        result
    }

    /// Removes a comment by id. Unknown ids are ignored.
    ///
    /// Calling this twice with the same id has the same effect as once.
    pub fn remove_comment(&mut self, comment_id: CommentId) -> Result<(), CommentServiceError> {
        let result = with_transaction(self.conn, |tx| -> Result<bool, CommentServiceError> {
            let comments = SqliteCommentRepository::try_new(tx)?;
            match comments.find_comment(comment_id)? {
                Some(comment) => Ok(comments.delete_comment(comment.id)?),
                None => Ok(false),
            }
        });

        match result {
            Ok(true) => {
                info!("event=comment_remove module=service status=ok comment_id={comment_id}");
                Ok(())
            }
            Ok(false) => {
                debug!("event=comment_remove module=service status=noop comment_id={comment_id}");
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=comment_remove module=service status=error comment_id={comment_id} error={err}"
                );
                Err(err)
            }
        }
    }

    /// Gets one comment by id.
    pub fn get_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<Option<BookComment>, CommentServiceError> {
        let comments = SqliteCommentRepository::try_new(self.conn)?;
        Ok(comments.find_comment(comment_id)?)
    }

    /// Lists a book's comments, computed from the owning-book index.
    ///
    /// The existence check and the listing read one snapshot, so a book
    /// deleted concurrently is reported as `BookNotFound`, never as an empty
    /// list.
    pub fn list_comments(
        &self,
        book_id: BookId,
    ) -> Result<Vec<BookComment>, CommentServiceError> {
        let tx = self.conn.unchecked_transaction()?;
        let listed = {
            let books = SqliteBookRepository::try_new(&tx)?;
            if books.get_by_id(book_id)?.is_none() {
                return Err(CommentServiceError::BookNotFound(book_id));
            }
            SqliteCommentRepository::try_new(&tx)?.list_comments(book_id)?
        };
        tx.commit()?;
        Ok(listed)
    }
}

fn add_comment_with(
    books: &impl BookLookup,
    comments: &impl CommentRepository,
    book_id: BookId,
    text: &str,
) -> Result<CommentId, CommentServiceError> {
    let book = books
        .get_by_id(book_id)?
        .ok_or(CommentServiceError::BookNotFound(book_id))?;
    Ok(comments.insert_comment(book.id, text)?)
}
