//! Catalog domain model.
//!
//! # Responsibility
//! - Define plain records for books, authors, genres and book comments.
//!
//! # Invariants
//! - Every entity is identified by a store-assigned integer id.
//! - Book-to-comment ownership lives only on the comment side.

pub mod book;
pub mod comment;
