//! Fixed-width table rendering for materialized results.
//!
//! Presentation only: column width is the maximum of the header width
//! and every cell width in that column, with 2-space padding, a dash
//! separator under the header, and a trailing row count. SQL NULL
//! cells display as the `NULL` token.

use std::io::{self, Write};

use crate::result::QueryResult;

/// Token shown for SQL NULL cells.
const NULL_TOKEN: &str = "NULL";

/// Padding added to every column width.
const PADDING: usize = 2;

/// Render a result set as a fixed-width table.
#[must_use]
pub fn format_table(result: &QueryResult) -> String {
    let columns = result.column_names();
    if columns.is_empty() {
        return "No columns\n".to_string();
    }

    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    for row in result.rows() {
        for (col, value) in row.values().iter().enumerate() {
            let len = value.as_deref().unwrap_or(NULL_TOKEN).len();
            if len > widths[col] {
                widths[col] = len;
            }
        }
    }

    let mut out = String::new();
    for (col, name) in columns.iter().enumerate() {
        let width = widths[col] + PADDING;
        out.push_str(&format!("{name:<width$}"));
    }
    out.push('\n');
    for &width in &widths {
        out.push_str(&"-".repeat(width + PADDING));
    }
    out.push('\n');
    for row in result.rows() {
        for (col, value) in row.values().iter().enumerate() {
            let width = widths[col] + PADDING;
            let text = value.as_deref().unwrap_or(NULL_TOKEN);
            out.push_str(&format!("{text:<width$}"));
        }
        out.push('\n');
    }
    out.push_str(&format!("Total rows: {}\n", result.row_count()));
    out
}

/// Write a result to `out`: the error message for error-state results,
/// an affected-row summary for data-free results, the table otherwise.
pub fn write_result<W: Write>(result: &QueryResult, out: &mut W) -> io::Result<()> {
    if let Some(message) = result.error_message() {
        return writeln!(out, "Error: {message}");
    }
    if !result.has_data() {
        return writeln!(
            out,
            "No data returned. Affected rows: {}",
            result.affected_rows()
        );
    }
    out.write_all(format_table(result).as_bytes())
}

/// Print a result to stdout.
pub fn print_result(result: &QueryResult) {
    // stdout write failure is not worth surfacing in a print helper
    let _ = write_result(result, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::execute_query;
    use crate::Connection;

    fn error_output(message: &str) -> String {
        let result = QueryResult::from_error(message);
        let mut buffer = Vec::new();
        write_result(&result, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_error_result_prints_message() {
        assert_eq!(error_output("bad status"), "Error: bad status\n");
    }

    #[test]
    fn test_no_columns_table() {
        let result = QueryResult::new();
        assert_eq!(format_table(&result), "No columns\n");
    }

    #[test]
    fn test_data_free_result_prints_affected_rows() {
        let result = QueryResult::new();
        let mut buffer = Vec::new();
        write_result(&result, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "No data returned. Affected rows: 0\n"
        );
    }

    #[test]
    fn test_table_layout() {
        let result = QueryResult::from_columns_and_rows(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![Some("1".to_string()), Some("Ada Lovelace".to_string())],
                vec![Some("2".to_string()), None],
            ],
        );
        let table = format_table(&result);
        let lines: Vec<&str> = table.lines().collect();
        // width: id -> max(2, 1) = 2, name -> max(4, 12) = 12; +2 padding
        assert_eq!(lines[0], "id  name          ");
        assert_eq!(lines[1], "------------------");
        assert_eq!(lines[2], "1   Ada Lovelace  ");
        assert_eq!(lines[3], "2   NULL          ");
        assert_eq!(lines[4], "Total rows: 2");
    }

    #[test]
    fn test_dead_connection_result_renders_error_line() {
        let connection = Connection::new();
        let result = execute_query(&connection, "SELECT 1");
        let mut buffer = Vec::new();
        write_result(&result, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("Error: "));
    }
}
