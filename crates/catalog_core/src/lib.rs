//! Core data access for the library catalog.
//! Books, authors, genres and book comments over SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{
    Author, AuthorId, Book, BookId, Genre, GenreId, ModelValidationError, NewBook,
};
pub use model::comment::{BookComment, CommentId};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookLookup, BookRepository, SqliteBookRepository};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::genre_repo::{GenreRepository, SqliteGenreRepository};
pub use repo::{EntityRef, RepoError, RepoResult};
pub use service::book_service::{BookDeletion, BookService, BookServiceError};
pub use service::comment_service::{CommentService, CommentServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
