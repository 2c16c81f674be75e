//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define entity-oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories borrow a `Connection`; a `Transaction` derefs to one, so
//!   the same repository runs inside a unit of work unchanged.
//! - Repositories never open transactions themselves.
//! - Construction rejects connections whose schema is not fully migrated.

pub mod author_repo;
pub mod book_repo;
pub mod comment_repo;
mod error;
pub mod genre_repo;
mod schema;

pub use error::{EntityRef, RepoError, RepoResult};
