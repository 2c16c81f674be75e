//! Explicit unit-of-work scoping over one SQLite transaction.
//!
//! # Invariants
//! - The closure sees a single IMMEDIATE transaction; nothing else writes
//!   through the same connection while it runs.
//! - `Ok` commits. `Err` rolls back. A panic rolls back when the transaction
//!   is dropped during unwinding.

use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `work` inside one transaction and commits only if it succeeds.
///
/// The error type only needs a conversion from `rusqlite::Error`, so service
/// errors can flow through unchanged.
pub fn with_transaction<T, E, F>(conn: &mut Connection, work: F) -> Result<T, E>
where
    E: From<rusqlite::Error>,
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match work(&tx) {
        Ok(value) => {
            tx.commit()?;
            debug!("event=unit_of_work module=db status=committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=unit_of_work module=db status=rollback_failed error={}",
                    rollback_err
                );
            } else {
                debug!("event=unit_of_work module=db status=rolled_back");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::with_transaction;
    use crate::db::{open_db_in_memory, DbError};
    use rusqlite::Connection;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn author_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn ok_result_commits() {
        let mut conn = open_db_in_memory().unwrap();

        let inserted = with_transaction(&mut conn, |tx| -> Result<i64, DbError> {
            tx.execute("INSERT INTO authors (name) VALUES ('Le Guin');", [])?;
            Ok(tx.last_insert_rowid())
        })
        .unwrap();

        assert!(inserted > 0);
        assert_eq!(author_count(&conn), 1);
    }

    #[test]
    fn err_result_rolls_back_every_statement() {
        let mut conn = open_db_in_memory().unwrap();

        let result = with_transaction(&mut conn, |tx| -> Result<(), DbError> {
            tx.execute("INSERT INTO authors (name) VALUES ('Le Guin');", [])?;
            tx.execute("INSERT INTO no_such_table (x) VALUES (1);", [])?;
            Ok(())
        });

        assert!(matches!(result, Err(DbError::Sqlite(_))));
        assert_eq!(author_count(&conn), 0);
    }

    #[test]
    fn panic_inside_work_rolls_back() {
        let mut conn = open_db_in_memory().unwrap();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _ = with_transaction(&mut conn, |tx| -> Result<(), DbError> {
                tx.execute("INSERT INTO authors (name) VALUES ('Le Guin');", [])?;
                panic!("boom");
            });
        }));

        assert!(outcome.is_err());
        assert_eq!(author_count(&conn), 0);
    }
}
