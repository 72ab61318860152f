//! Owned, handle-free representation of a completed statement.
//!
//! Materialization copies everything out of the transient native
//! result, so a [`QueryResult`] outlives the guard it was built from.
//! An error-state result carries no rows or columns, only the message.

use std::sync::Arc;

use pq_sys::ExecStatusType;

use crate::result::guard::PgResult;
use crate::result::row::{Row, RowShape};

/// Materialized result set: rows, column metadata, affected-row count,
/// and an optional error message.
#[derive(Debug, Default)]
pub struct QueryResult {
    rows: Vec<Row>,
    shape: Arc<RowShape>,
    affected_rows: u64,
    error: Option<String>,
}

impl QueryResult {
    /// Empty success-state result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a native result.
    ///
    /// - tuples: column names are captured in server order, every cell
    ///   is copied (NULL-aware), and the affected-row count equals the
    ///   row count;
    /// - command completion: the affected-row count is the server's
    ///   reported mutation count;
    /// - anything else: an error-state result with the status text.
    #[must_use]
    pub fn from_raw(result: &PgResult) -> Self {
        match result.status() {
            ExecStatusType::PGRES_TUPLES_OK => {
                let nfields = result.nfields();
                let columns = (0..nfields)
                    .map(|col| result.column_name(col).unwrap_or_default())
                    .collect();
                let shape = Arc::new(RowShape::new(columns));
                let ntuples = result.ntuples();
                let mut rows = Vec::with_capacity(ntuples);
                for row in 0..ntuples {
                    let values = (0..nfields).map(|col| result.value(row, col)).collect();
                    rows.push(Row::new(Arc::clone(&shape), values));
                }
                Self {
                    rows,
                    shape,
                    affected_rows: ntuples as u64,
                    error: None,
                }
            }
            ExecStatusType::PGRES_COMMAND_OK => Self {
                affected_rows: result.command_tuples(),
                ..Self::default()
            },
            _ => Self::from_error(result.status_str()),
        }
    }

    /// Error-state result carrying only a message.
    #[must_use]
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Reset to an empty success state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Row at `index`, if present.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// All rows in server order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Column names in server-reported order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.shape.columns()
    }

    /// Number of materialized rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.shape.columns().len()
    }

    /// Rows returned (reads) or server-reported mutation count
    /// (writes).
    #[must_use]
    pub const fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    /// True iff at least one row was returned.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// True iff this is an error-state result.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// First row, if any.
    #[must_use]
    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// First row's cell in the named column, or `default`.
    pub fn first_value(&self, column: &str, default: &str) -> String {
        self.first_row()
            .map_or_else(|| default.to_string(), |row| row.get_string(column, default))
    }

    /// First row's cell in the named column parsed as an integer, or
    /// `default`.
    pub fn first_int(&self, column: &str, default: i64) -> i64 {
        self.first_row()
            .map_or(default, |row| row.get_int(column, default))
    }

    /// Build a result directly from columns and cell rows.
    #[cfg(test)]
    pub(crate) fn from_columns_and_rows(
        columns: Vec<String>,
        cell_rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        let shape = Arc::new(RowShape::new(columns));
        let rows: Vec<Row> = cell_rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&shape), values))
            .collect();
        let affected_rows = rows.len() as u64;
        Self {
            rows,
            shape,
            affected_rows,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> QueryResult {
        let shape = Arc::new(RowShape::new(vec!["id".to_string(), "name".to_string()]));
        let rows = vec![
            Row::new(
                Arc::clone(&shape),
                vec![Some("1".to_string()), Some("Ada".to_string())],
            ),
            Row::new(Arc::clone(&shape), vec![Some("2".to_string()), None]),
        ];
        QueryResult {
            rows,
            shape,
            affected_rows: 2,
            error: None,
        }
    }

    #[test]
    fn test_row_count_matches_rows() {
        let result = sample_result();
        assert_eq!(result.row_count(), result.rows().len());
        assert_eq!(result.affected_rows(), 2);
        assert!(result.has_data());
        assert!(!result.has_error());
    }

    #[test]
    fn test_every_row_shares_column_names() {
        let result = sample_result();
        for row in result.rows() {
            assert_eq!(row.columns(), result.column_names());
        }
    }

    #[test]
    fn test_error_state_carries_no_rows() {
        let result = QueryResult::from_error("PGRES_FATAL_ERROR");
        assert!(result.has_error());
        assert_eq!(result.error_message(), Some("PGRES_FATAL_ERROR"));
        assert_eq!(result.row_count(), 0);
        assert!(result.column_names().is_empty());
        assert!(!result.has_data());
    }

    #[test]
    fn test_clear_resets_to_empty_success() {
        let mut result = QueryResult::from_error("boom");
        result.clear();
        assert!(!result.has_error());
        assert_eq!(result.affected_rows(), 0);
        assert_eq!(result.row_count(), 0);
    }

    #[test]
    fn test_first_value_and_first_int() {
        let result = sample_result();
        assert_eq!(result.first_value("name", "none"), "Ada");
        assert_eq!(result.first_int("id", -1), 1);

        let empty = QueryResult::new();
        assert_eq!(empty.first_value("name", "none"), "none");
        assert_eq!(empty.first_int("id", -1), -1);
    }

    #[test]
    fn test_row_lookup_out_of_range() {
        let result = sample_result();
        assert!(result.row(1).is_some());
        assert!(result.row(2).is_none());
    }
}
