//! Column-name-indexed view over one row of a materialized result.
//!
//! Cells are stored as text, matching the wire format. SQL NULL is
//! kept distinct from a literal empty string: a NULL cell is `None`,
//! an empty string is `Some("")`. Typed accessors parse on demand and
//! degrade to a caller-supplied default; parse failures are logged at
//! `debug` and never propagate.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// Column layout shared by every row of one result set.
#[derive(Debug, Default)]
pub(crate) struct RowShape {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl RowShape {
    pub(crate) fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(position, name)| (name.clone(), position))
            .collect();
        Self { columns, index }
    }

    pub(crate) fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for &str {}
}

/// Row cell lookup by position or by column name.
///
/// Implemented for `usize` (positional) and `&str` (by name), so the
/// accessor pairs of the C-style APIs collapse into one method each.
pub trait RowIndex: sealed::Sealed {
    /// Resolve to a cell position within the row, if any.
    fn position(&self, row: &Row) -> Option<usize>;
}

impl RowIndex for usize {
    fn position(&self, row: &Row) -> Option<usize> {
        (*self < row.values.len()).then_some(*self)
    }
}

impl RowIndex for &str {
    fn position(&self, row: &Row) -> Option<usize> {
        row.shape.position(self)
    }
}

/// Immutable view over one row's cell values.
#[derive(Debug)]
pub struct Row {
    shape: Arc<RowShape>,
    values: Vec<Option<String>>,
}

impl Row {
    /// Values and columns are required to have equal length.
    pub(crate) fn new(shape: Arc<RowShape>, values: Vec<Option<String>>) -> Self {
        debug_assert_eq!(shape.columns().len(), values.len());
        Self { shape, values }
    }

    /// Cell text, `None` for SQL NULL or an unknown index.
    pub fn get<I: RowIndex>(&self, index: I) -> Option<&str> {
        let position = index.position(self)?;
        self.values.get(position)?.as_deref()
    }

    /// Cell text, or `default` for NULL or an unknown index.
    pub fn get_string<I: RowIndex>(&self, index: I, default: &str) -> String {
        self.get(index)
            .map_or_else(|| default.to_string(), ToString::to_string)
    }

    /// Cell parsed as an integer, or `default` on NULL, unknown index,
    /// or parse failure.
    pub fn get_int<I: RowIndex>(&self, index: I, default: i64) -> i64 {
        self.parse_with_default(index, default)
    }

    /// Cell parsed as a double, or `default` on NULL, unknown index,
    /// or parse failure.
    pub fn get_double<I: RowIndex>(&self, index: I, default: f64) -> f64 {
        self.parse_with_default(index, default)
    }

    /// Cell interpreted as a boolean.
    ///
    /// Recognizes `t`/`true`/`1`/`yes` and `f`/`false`/`0`/`no`; any
    /// other token (including NULL) yields `default`.
    pub fn get_bool<I: RowIndex>(&self, index: I, default: bool) -> bool {
        match self.get(index) {
            Some("t" | "true" | "1" | "yes") => true,
            Some("f" | "false" | "0" | "no") => false,
            _ => default,
        }
    }

    /// True iff the cell is SQL NULL (or the index is unknown).
    pub fn is_null<I: RowIndex>(&self, index: I) -> bool {
        self.get(index).is_none()
    }

    /// True iff a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.shape.position(name).is_some()
    }

    /// Column names in server-reported order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.shape.columns()
    }

    /// Cell values in column order; `None` marks SQL NULL.
    #[must_use]
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Number of cells in the row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.values.len()
    }

    /// True iff the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Single parse-with-default routine backing all numeric
    /// accessors. Failures are logged once and degrade to the default.
    fn parse_with_default<I, T>(&self, index: I, default: T) -> T
    where
        I: RowIndex,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(text) = self.get(index) else {
            return default;
        };
        match text.trim().parse() {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(value = text, error = %error, "cell failed to parse, using default");
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        let shape = Arc::new(RowShape::new(vec![
            "id".to_string(),
            "name".to_string(),
            "score".to_string(),
            "active".to_string(),
            "note".to_string(),
        ]));
        Row::new(
            shape,
            vec![
                Some("42".to_string()),
                Some("Ada".to_string()),
                Some("3.5".to_string()),
                Some("t".to_string()),
                None,
            ],
        )
    }

    #[test]
    fn test_get_by_name_and_index_agree() {
        let row = sample_row();
        let columns = row.columns().to_vec();
        for (position, name) in columns.iter().enumerate() {
            assert_eq!(row.get(position), row.get(name.as_str()));
        }
    }

    #[test]
    fn test_get_int_parses_and_defaults() {
        let row = sample_row();
        assert_eq!(row.get_int("id", 0), 42);
        assert_eq!(row.get_int("name", -1), -1);
        assert_eq!(row.get_int("note", 7), 7);
        assert_eq!(row.get_int("missing", 9), 9);
    }

    #[test]
    fn test_get_double_parses_and_defaults() {
        let row = sample_row();
        assert!((row.get_double("score", 0.0) - 3.5).abs() < f64::EPSILON);
        assert!((row.get_double("name", 1.25) - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_get_bool_token_sets() {
        let shape = Arc::new(RowShape::new(vec!["v".to_string()]));
        for (token, expected) in [
            ("t", true),
            ("true", true),
            ("1", true),
            ("yes", true),
            ("f", false),
            ("false", false),
            ("0", false),
            ("no", false),
        ] {
            let row = Row::new(Arc::clone(&shape), vec![Some(token.to_string())]);
            assert_eq!(row.get_bool(0, !expected), expected, "token {token}");
        }
        let row = Row::new(shape, vec![Some("maybe".to_string())]);
        assert!(row.get_bool(0, true));
        assert!(!row.get_bool(0, false));
    }

    #[test]
    fn test_null_is_distinct_from_empty_string() {
        let shape = Arc::new(RowShape::new(vec!["a".to_string(), "b".to_string()]));
        let row = Row::new(shape, vec![None, Some(String::new())]);
        assert!(row.is_null("a"));
        assert!(!row.is_null("b"));
        assert_eq!(row.get("a"), None);
        assert_eq!(row.get("b"), Some(""));
        assert_eq!(row.get_string("a", "fallback"), "fallback");
        assert_eq!(row.get_string("b", "fallback"), "");
    }

    #[test]
    fn test_get_string_default_for_unknown_column() {
        let row = sample_row();
        assert_eq!(row.get_string("nope", "dflt"), "dflt");
        assert_eq!(row.get_string(99, "dflt"), "dflt");
    }

    #[test]
    fn test_shape_queries() {
        let row = sample_row();
        assert!(row.has_column("score"));
        assert!(!row.has_column("SCORE"));
        assert_eq!(row.column_count(), 5);
        assert!(!row.is_empty());
    }
}
