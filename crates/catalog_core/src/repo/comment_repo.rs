//! Book comment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert, find and delete comments in `book_comments`.
//! - Compute a book's comment list by query on the owning-book index.
//!
//! # Invariants
//! - Comment ids are assigned by SQLite at insert time, never by callers.
//! - Comment text is stored verbatim.
//! - Listing order is deterministic: `comment_id ASC`.

use super::schema::{ensure_connection_ready, TableSpec};
use super::RepoResult;
use crate::model::book::BookId;
use crate::model::comment::{BookComment, CommentId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COMMENT_TABLES: &[TableSpec] = &[("book_comments", &["comment_id", "book_id", "comment"])];

const COMMENT_SELECT_SQL: &str = "SELECT
    comment_id,
    book_id,
    comment
FROM book_comments";

/// Repository interface for book comments.
pub trait CommentRepository {
    /// Inserts a comment owned by `book_id` and returns the assigned id.
    ///
    /// The owning book must exist; the foreign key rejects dangling owners.
    fn insert_comment(&self, book_id: BookId, text: &str) -> RepoResult<CommentId>;
    fn find_comment(&self, id: CommentId) -> RepoResult<Option<BookComment>>;
    fn list_comments(&self, book_id: BookId) -> RepoResult<Vec<BookComment>>;
    /// Returns `false` when no comment had this id.
    fn delete_comment(&self, id: CommentId) -> RepoResult<bool>;
    /// Deletes every comment owned by `book_id`, returning how many went.
    fn delete_comments_for_book(&self, book_id: BookId) -> RepoResult<usize>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    /// Constructs a repository from a migrated connection or transaction.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, COMMENT_TABLES)?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn insert_comment(&self, book_id: BookId, text: &str) -> RepoResult<CommentId> {
        self.conn.execute(
            "INSERT INTO book_comments (book_id, comment) VALUES (?1, ?2);",
            params![book_id, text],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_comment(&self, id: CommentId) -> RepoResult<Option<BookComment>> {
        let comment = self
            .conn
            .query_row(
                &format!("{COMMENT_SELECT_SQL} WHERE comment_id = ?1;"),
                [id],
                parse_comment_row,
            )
            .optional()?;
        Ok(comment)
    }

    fn list_comments(&self, book_id: BookId) -> RepoResult<Vec<BookComment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_SELECT_SQL}
             WHERE book_id = ?1
             ORDER BY comment_id ASC;"
        ))?;
        let comments = stmt
            .query_map([book_id], parse_comment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM book_comments WHERE comment_id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_comments_for_book(&self, book_id: BookId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM book_comments WHERE book_id = ?1;", [book_id])?;
        Ok(changed)
    }
}

fn parse_comment_row(row: &Row<'_>) -> rusqlite::Result<BookComment> {
    Ok(BookComment {
        id: row.get("comment_id")?,
        book_id: row.get("book_id")?,
        comment: row.get("comment")?,
    })
}
