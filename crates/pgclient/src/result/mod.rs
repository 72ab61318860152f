//! Result handling: native guard, row view, and materialized set.
//!
//! Provides:
//! - [`PgResult`]: exactly-once release of the native handle
//! - [`Row`]: immutable, name-indexed view with typed accessors
//! - [`QueryResult`]: owned, handle-free result representation

pub mod guard;
pub mod row;
pub mod set;

pub use guard::PgResult;
pub use row::{Row, RowIndex};
pub use set::QueryResult;
