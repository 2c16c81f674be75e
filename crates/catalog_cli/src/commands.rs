//! Subcommand definitions and handlers.

use anyhow::{Context, Result};
use catalog_core::{
    AuthorId, Book, BookComment, BookId, BookService, CommentId, CommentService, GenreId, NewBook,
};
use clap::Subcommand;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Subcommand)]
pub enum AuthorCommand {
    /// Create an author
    Add { name: String },
    /// List all authors
    List,
}

#[derive(Subcommand)]
pub enum GenreCommand {
    /// Create a genre
    Add { name: String },
    /// List all genres
    List,
}

#[derive(Subcommand)]
pub enum BookCommand {
    /// Create a book
    Add {
        title: String,
        /// Author id (repeatable)
        #[arg(long = "author")]
        authors: Vec<AuthorId>,
        /// Genre id (repeatable)
        #[arg(long = "genre")]
        genres: Vec<GenreId>,
    },
    /// Show one book with its comments
    Show { id: BookId },
    /// List all books
    List,
    /// Delete a book and all of its comments
    Delete { id: BookId },
}

#[derive(Subcommand)]
pub enum CommentCommand {
    /// Attach a comment to a book
    Add { book_id: BookId, text: String },
    /// Remove a comment; unknown ids are ignored
    Remove { comment_id: CommentId },
}

/// Book detail view with comments computed from the owning-book index.
#[derive(Serialize)]
struct BookDetail {
    #[serde(flatten)]
    book: Book,
    comments: Vec<BookComment>,
}

#[derive(Serialize)]
struct CommentAdded {
    id: CommentId,
    book_id: BookId,
}

#[derive(Serialize)]
struct CommentRemoved {
    comment_id: CommentId,
}

pub fn author(conn: &mut Connection, command: AuthorCommand) -> Result<()> {
    let mut service = BookService::try_new(conn)?;
    match command {
        AuthorCommand::Add { name } => print_json(&service.create_author(&name)?),
        AuthorCommand::List => print_json(&service.list_authors()?),
    }
}

pub fn genre(conn: &mut Connection, command: GenreCommand) -> Result<()> {
    let mut service = BookService::try_new(conn)?;
    match command {
        GenreCommand::Add { name } => print_json(&service.create_genre(&name)?),
        GenreCommand::List => print_json(&service.list_genres()?),
    }
}

pub fn book(conn: &mut Connection, command: BookCommand) -> Result<()> {
    match command {
        BookCommand::Add {
            title,
            authors,
            genres,
        } => {
            let mut service = BookService::try_new(conn)?;
            let input = NewBook::new(title).with_authors(authors).with_genres(genres);
            print_json(&service.create_book(&input)?)
        }
        BookCommand::Show { id } => {
            let book = BookService::try_new(conn)?
                .get_book(id)?
                .with_context(|| format!("book not found: {id}"))?;
            let comments = CommentService::try_new(conn)?.list_comments(id)?;
            print_json(&BookDetail { book, comments })
        }
        BookCommand::List => print_json(&BookService::try_new(conn)?.list_books()?),
        BookCommand::Delete { id } => {
            print_json(&BookService::try_new(conn)?.delete_book(id)?)
        }
    }
}

pub fn comment(conn: &mut Connection, command: CommentCommand) -> Result<()> {
    let mut service = CommentService::try_new(conn)?;
    match command {
        CommentCommand::Add { book_id, text } => {
            let id = service.add_comment(book_id, &text)?;
            print_json(&CommentAdded { id, book_id })
        }
        CommentCommand::Remove { comment_id } => {
            service.remove_comment(comment_id)?;
            print_json(&CommentRemoved { comment_id })
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
