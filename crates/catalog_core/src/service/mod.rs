//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own unit-of-work boundaries: one transaction per mutating call.

pub mod book_service;
pub mod comment_service;
