//! Safe PostgreSQL client access layer over libpq.
//!
//! This crate wraps the raw `pq-sys` bindings in owning handles with
//! exactly-once resource release, executes plain, parameterized, and
//! prepared statements with one consistent status classification, and
//! materializes native results into owned, name-indexed row
//! structures. Multi-statement transactions commit atomically or roll
//! back on the first failure.
//!
//! # Features
//!
//! - Move-only [`Connection`] and [`PgResult`] ownership; native
//!   handles are freed exactly once on every exit path
//! - Text-format positional parameters (`$n`) with SQL NULL support
//! - Typed row accessors that degrade to caller-supplied defaults
//! - Transaction envelope with rollback-before-propagate semantics
//!
//! # Example
//!
//! ```rust,ignore
//! use pgclient::{helpers, Connection, Query};
//!
//! let conn = Connection::establish("host=localhost dbname=app user=app")?;
//! let query = Query::new(&conn)?;
//! query.execute_params(
//!     "INSERT INTO users (name, age) VALUES ($1, $2)",
//!     &["Ada", "36"],
//! )?;
//! let users = helpers::execute_query(&conn, "SELECT name, age FROM users");
//! for row in users.rows() {
//!     println!("{} ({})", row.get_string("name", "?"), row.get_int("age", 0));
//! }
//! ```
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod connection;
pub mod display;
pub mod error;
pub mod helpers;
pub mod query;
pub mod result;
pub mod transaction;

// Re-export main types for convenience
pub use connection::{ConnectParams, Connection};
pub use error::{Error, Result};
pub use query::{Query, ToSqlText};
pub use result::{PgResult, QueryResult, Row, RowIndex};
pub use transaction::{execute_batch, execute_transaction, with_transaction};

// Driver-defined status enums surfaced by `Connection::status` and
// `PgResult::status`.
pub use pq_sys::{ConnStatusType, ExecStatusType};
