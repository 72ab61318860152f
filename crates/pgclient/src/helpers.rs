//! Connection-level conveniences with a non-raising error surface.
//!
//! These helpers report every failure, including an unhealthy
//! connection, through the [`QueryResult`] error message, so callers
//! that only want to inspect data check `has_error()` in one place.

use crate::connection::Connection;
use crate::query::{Query, ToSqlText};
use crate::result::QueryResult;

/// Execute a statement and materialize the outcome.
#[must_use]
pub fn execute_query(conn: &Connection, sql: &str) -> QueryResult {
    match Query::new(conn).and_then(|query| query.execute(sql)) {
        Ok(result) => QueryResult::from_raw(&result),
        Err(error) => QueryResult::from_error(error.to_string()),
    }
}

/// Execute a parameterized statement and materialize the outcome.
#[must_use]
pub fn execute_query_params<P: ToSqlText>(
    conn: &Connection,
    sql: &str,
    params: &[P],
) -> QueryResult {
    match Query::new(conn).and_then(|query| query.execute_params(sql, params)) {
        Ok(result) => QueryResult::from_raw(&result),
        Err(error) => QueryResult::from_error(error.to_string()),
    }
}

/// Probe the connection with `SELECT 1`.
#[must_use]
pub fn test_connection(conn: &Connection) -> bool {
    !execute_query(conn, "SELECT 1").has_error()
}

/// Server version, current database, and current user as a printable
/// summary. `None` when the probe fails.
#[must_use]
pub fn database_info(conn: &Connection) -> Option<String> {
    let result = execute_query(conn, "SELECT version(), current_database(), current_user");
    if result.has_error() {
        return None;
    }
    let row = result.first_row()?;
    Some(format!(
        "Version: {}\nDatabase: {}\nUser: {}",
        row.get_string("version", ""),
        row.get_string("current_database", ""),
        row.get_string("current_user", "")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_query_reports_dead_connection_in_result() {
        let connection = Connection::new();
        let result = execute_query(&connection, "SELECT 1");
        assert!(result.has_error());
        assert!(
            result
                .error_message()
                .is_some_and(|message| message.contains("not established"))
        );
        assert_eq!(result.row_count(), 0);
    }

    #[test]
    fn test_execute_query_params_reports_dead_connection() {
        let connection = Connection::new();
        let result = execute_query_params(&connection, "SELECT $1", &["x"]);
        assert!(result.has_error());
    }

    #[test]
    fn test_probes_fail_without_connection() {
        let connection = Connection::new();
        assert!(!test_connection(&connection));
        assert!(database_info(&connection).is_none());
    }
}
