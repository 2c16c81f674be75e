//! Catalog entity model: books, authors and genres.
//!
//! # Responsibility
//! - Define the canonical records stored in the catalog.
//! - Validate externally supplied names/titles before persistence.
//!
//! # Invariants
//! - Identifiers are assigned by the store on insert and never reused.
//! - A book's authors and genres are unique sets, exposed sorted by id.
//! - A book does not carry its comments; they are computed by query from
//!   `book_comments.book_id`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned book identifier.
pub type BookId = i64;
/// Store-assigned author identifier.
pub type AuthorId = i64;
/// Store-assigned genre identifier.
pub type GenreId = i64;

/// Validation failures for catalog entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Book title is empty after trimming.
    BlankTitle,
    /// Author or genre name is empty after trimming.
    BlankName(&'static str),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title must not be blank"),
            Self::BlankName(entity) => write!(f, "{entity} name must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}

/// Book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

/// Book genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Catalog book with its eagerly loaded author and genre sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    /// Sorted by author id; never contains duplicates.
    pub authors: Vec<Author>,
    /// Sorted by genre id; never contains duplicates.
    pub genres: Vec<Genre>,
}

impl Book {
    pub fn has_author(&self, id: AuthorId) -> bool {
        self.authors.iter().any(|author| author.id == id)
    }

    pub fn has_genre(&self, id: GenreId) -> bool {
        self.genres.iter().any(|genre| genre.id == id)
    }
}

/// Creation input for a book. The id is assigned on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author_ids: Vec<AuthorId>,
    pub genre_ids: Vec<GenreId>,
}

impl NewBook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_authors(mut self, ids: impl IntoIterator<Item = AuthorId>) -> Self {
        self.author_ids.extend(ids);
        self
    }

    pub fn with_genres(mut self, ids: impl IntoIterator<Item = GenreId>) -> Self {
        self.genre_ids.extend(ids);
        self
    }

    /// Checks the title and collapses duplicate author/genre ids.
    ///
    /// Returns the normalized input that repositories persist.
    pub fn validated(&self) -> Result<NewBook, ModelValidationError> {
        let title = validate_title(&self.title)?;
        Ok(NewBook {
            title,
            author_ids: dedup_sorted(&self.author_ids),
            genre_ids: dedup_sorted(&self.genre_ids),
        })
    }
}

/// Trims a book title and rejects blank values.
pub fn validate_title(title: &str) -> Result<String, ModelValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

/// Trims an author/genre name and rejects blank values.
pub fn validate_name(entity: &'static str, name: &str) -> Result<String, ModelValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::BlankName(entity));
    }
    Ok(trimmed.to_string())
}

fn dedup_sorted(ids: &[i64]) -> Vec<i64> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

#[cfg(test)]
mod tests {
    use super::{validate_name, ModelValidationError, NewBook};

    #[test]
    fn validated_trims_title_and_dedups_links() {
        let input = NewBook::new("  Dune ")
            .with_authors([3, 1, 3])
            .with_genres([2, 2]);

        let normalized = input.validated().unwrap();
        assert_eq!(normalized.title, "Dune");
        assert_eq!(normalized.author_ids, vec![1, 3]);
        assert_eq!(normalized.genre_ids, vec![2]);
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = NewBook::new(" \t").validated().unwrap_err();
        assert_eq!(err, ModelValidationError::BlankTitle);
    }

    #[test]
    fn blank_name_reports_entity() {
        let err = validate_name("genre", "").unwrap_err();
        assert_eq!(err.to_string(), "genre name must not be blank");
    }
}
