//! Transaction coordination: BEGIN, run items, COMMIT or ROLLBACK.
//!
//! One envelope, [`with_transaction`], backs both the statement-list
//! and parameterized-batch modes. Any failure inside the envelope
//! triggers a rollback attempt before the error is propagated; a
//! failed BEGIN never runs the body, and a failed COMMIT is the
//! envelope's own error (commits are not retried).

use crate::connection::Connection;
use crate::error::Result;
use crate::query::{Query, ToSqlText};

/// Run `body` inside BEGIN/COMMIT, rolling back on failure.
///
/// A rollback failure after an aborted body is logged but does not
/// mask the original error.
pub fn with_transaction<T, F>(conn: &Connection, body: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    conn.begin()?;
    match body() {
        Ok(value) => {
            conn.commit()?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = conn.rollback() {
                tracing::warn!(error = %rollback_error, "rollback failed after aborted transaction");
            }
            Err(error)
        }
    }
}

/// Execute a list of plain statements atomically.
///
/// The first failing statement aborts the sequence and rolls the
/// transaction back.
pub fn execute_transaction<S: AsRef<str>>(conn: &Connection, statements: &[S]) -> Result<()> {
    with_transaction(conn, || {
        let query = Query::new(conn)?;
        for statement in statements {
            query.execute_command(statement.as_ref())?;
        }
        Ok(())
    })
}

/// Execute one parameterized statement once per parameter set,
/// atomically.
pub fn execute_batch<P: ToSqlText>(
    conn: &Connection,
    sql: &str,
    param_sets: &[Vec<P>],
) -> Result<()> {
    with_transaction(conn, || {
        let query = Query::new(conn)?;
        for params in param_sets {
            query.execute_params(sql, params)?;
        }
        Ok(())
    })
}
