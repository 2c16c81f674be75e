//! Book comment model.
//!
//! # Invariants
//! - Every comment belongs to exactly one book (`book_id` is never null).
//! - Comment text is stored verbatim; no length or content validation.

use super::book::BookId;
use serde::{Deserialize, Serialize};

/// Store-assigned comment identifier.
pub type CommentId = i64;

/// Reader comment attached to one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookComment {
    pub id: CommentId,
    /// Owning book. The only link between a comment and its book.
    pub book_id: BookId,
    pub comment: String,
}
