use catalog_core::db::{open_db, open_db_in_memory};
use catalog_core::{
    BookComment, BookId, BookService, CommentService, CommentServiceError, NewBook, RepoError,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn seed_book(conn: &mut Connection, title: &str) -> BookId {
    let mut books = BookService::try_new(conn).unwrap();
    books.create_book(&NewBook::new(title)).unwrap().id
}

fn comment_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM book_comments;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_comment_is_visible_on_reread_of_the_book() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    let mut service = CommentService::try_new(&mut conn).unwrap();

    let id = service.add_comment(book_id, "new comment").unwrap();

    let comments = service.list_comments(book_id).unwrap();
    assert_eq!(
        comments,
        vec![BookComment {
            id,
            book_id,
            comment: "new comment".to_string(),
        }]
    );
}

#[test]
fn add_comment_assigns_distinct_ids() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    let mut service = CommentService::try_new(&mut conn).unwrap();

    let first = service.add_comment(book_id, "one").unwrap();
    let second = service.add_comment(book_id, "one").unwrap();

    assert_ne!(first, second);
    assert_eq!(service.list_comments(book_id).unwrap().len(), 2);
}

#[test]
fn add_comment_to_unknown_book_is_invalid_argument_and_creates_nothing() {
    let mut conn = setup();
    seed_book(&mut conn, "Existing");
    let mut service = CommentService::try_new(&mut conn).unwrap();

    let err = service.add_comment(999, "lost").unwrap_err();
    assert!(matches!(err, CommentServiceError::BookNotFound(999)));
    assert!(err.is_invalid_argument());
    assert_eq!(err.to_string(), "book not found: 999");

    drop(service);
    assert_eq!(comment_count(&conn), 0);
}

#[test]
fn add_comment_stores_text_verbatim() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    let mut service = CommentService::try_new(&mut conn).unwrap();
    let text = format!("  multi\nline ✓ {}", "x".repeat(10_000));

    let id = service.add_comment(book_id, &text).unwrap();

    let stored = service.get_comment(id).unwrap().unwrap();
    assert_eq!(stored.comment, text);
}

#[test]
fn remove_comment_deletes_it_from_lookup_and_book() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    let mut service = CommentService::try_new(&mut conn).unwrap();
    let kept = service.add_comment(book_id, "kept").unwrap();
    let removed = service.add_comment(book_id, "removed").unwrap();

    service.remove_comment(removed).unwrap();

    assert!(service.get_comment(removed).unwrap().is_none());
    let remaining: Vec<_> = service
        .list_comments(book_id)
        .unwrap()
        .into_iter()
        .map(|comment| comment.id)
        .collect();
    assert_eq!(remaining, vec![kept]);
}

#[test]
fn remove_unknown_comment_is_a_silent_noop() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    let mut service = CommentService::try_new(&mut conn).unwrap();
    let id = service.add_comment(book_id, "stays").unwrap();

    service.remove_comment(id + 1000).unwrap();

    assert_eq!(service.list_comments(book_id).unwrap().len(), 1);
}

#[test]
fn remove_comment_twice_equals_once() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    let mut service = CommentService::try_new(&mut conn).unwrap();
    let id = service.add_comment(book_id, "gone").unwrap();
    let other = service.add_comment(book_id, "other").unwrap();

    service.remove_comment(id).unwrap();
    let after_once = service.list_comments(book_id).unwrap();
    service.remove_comment(id).unwrap();
    let after_twice = service.list_comments(book_id).unwrap();

    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice[0].id, other);
}

#[test]
fn list_comments_of_unknown_book_fails() {
    let mut conn = setup();
    let service = CommentService::try_new(&mut conn).unwrap();

    assert!(matches!(
        service.list_comments(5),
        Err(CommentServiceError::BookNotFound(5))
    ));
}

#[test]
fn add_then_remove_scenario_with_store_assigned_id() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    assert_eq!(book_id, 1);
    // Next AUTOINCREMENT value becomes 100.
    conn.execute(
        "INSERT INTO sqlite_sequence (name, seq) VALUES ('book_comments', 99);",
        [],
    )
    .unwrap();

    let mut service = CommentService::try_new(&mut conn).unwrap();
    assert!(service.list_comments(book_id).unwrap().is_empty());

    let id = service.add_comment(book_id, "nice book").unwrap();
    assert_eq!(id, 100);
    assert_eq!(
        service.list_comments(book_id).unwrap(),
        vec![BookComment {
            id: 100,
            book_id: 1,
            comment: "nice book".to_string(),
        }]
    );

    service.remove_comment(100).unwrap();
    assert!(service.list_comments(book_id).unwrap().is_empty());
}

#[test]
fn failed_comment_insert_surfaces_store_error_and_writes_nothing() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    conn.execute_batch(
        "CREATE TRIGGER reject_comment_insert BEFORE INSERT ON book_comments
         BEGIN SELECT RAISE(ABORT, 'comment store unavailable'); END;",
    )
    .unwrap();

    let mut service = CommentService::try_new(&mut conn).unwrap();
    let err = service.add_comment(book_id, "lost").unwrap_err();

    assert!(matches!(err, CommentServiceError::Repo(RepoError::Db(_))));
    assert!(!err.is_invalid_argument());
    drop(service);
    assert_eq!(comment_count(&conn), 0);
    assert!(conn.is_autocommit());
}

#[test]
fn failed_comment_delete_surfaces_store_error_and_keeps_comment() {
    let mut conn = setup();
    let book_id = seed_book(&mut conn, "Foo");
    let id = CommentService::try_new(&mut conn)
        .unwrap()
        .add_comment(book_id, "stays")
        .unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_comment_delete BEFORE DELETE ON book_comments
         BEGIN SELECT RAISE(ABORT, 'comment store unavailable'); END;",
    )
    .unwrap();

    let mut service = CommentService::try_new(&mut conn).unwrap();
    let err = service.remove_comment(id).unwrap_err();

    assert!(matches!(err, CommentServiceError::Repo(RepoError::Db(_))));
    assert!(service.get_comment(id).unwrap().is_some());
    drop(service);
    assert_eq!(comment_count(&conn), 1);
    assert!(conn.is_autocommit());
}

#[test]
fn list_comments_sees_book_deleted_by_another_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");
    let mut reader = open_db(&path).unwrap();
    let mut writer = open_db(&path).unwrap();
    let book_id = seed_book(&mut writer, "Foo");
    CommentService::try_new(&mut writer)
        .unwrap()
        .add_comment(book_id, "first")
        .unwrap();

    let service = CommentService::try_new(&mut reader).unwrap();
    assert_eq!(service.list_comments(book_id).unwrap().len(), 1);

    BookService::try_new(&mut writer)
        .unwrap()
        .delete_book(book_id)
        .unwrap();

    assert!(matches!(
        service.list_comments(book_id),
        Err(CommentServiceError::BookNotFound(id)) if id == book_id
    ));
    drop(service);
    // The read transaction is closed again, so the writer is not blocked.
    assert!(reader.is_autocommit());
    seed_book(&mut writer, "Bar");
}

#[test]
fn comments_serialize_with_owning_book_id() {
    let comment = BookComment {
        id: 3,
        book_id: 1,
        comment: "ok".to_string(),
    };

    let json = serde_json::to_value(&comment).unwrap();
    assert_eq!(json["book_id"], 1);
    assert_eq!(json["comment"], "ok");
}
