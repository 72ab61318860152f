//! Error types for the client access layer.
//!
//! One crate-wide [`Error`] enum with `is_xxx()` predicate methods.
//! Execution-time failures are reported through `Result` values; the
//! only construction-time failure is building a [`crate::Query`]
//! against a connection that is not usable.

use thiserror::Error;

/// Root error type for pgclient.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Opening a session failed, or a partially opened session had to
    /// be discarded.
    #[error("connection failed: {0}")]
    Connect(String),

    /// An operation required a healthy connection and none was held.
    #[error("database connection is not established")]
    NotConnected,

    /// Statement text was empty; the server was never contacted.
    #[error("statement text is empty")]
    EmptyStatement,

    /// The server reported a non-success status for a statement.
    #[error("statement failed ({status}): {message}")]
    Statement {
        /// Server status text, e.g. `PGRES_FATAL_ERROR`.
        status: String,
        /// Driver error text at the time of failure.
        message: String,
        /// The offending statement (or prepared-statement name).
        statement: String,
    },

    /// A statement or parameter could not be passed to the driver,
    /// e.g. because it contains an interior NUL byte.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Create a connect error.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect(message.into())
    }

    /// Create a statement error with full diagnostic context.
    #[must_use]
    pub fn statement(
        status: impl Into<String>,
        message: impl Into<String>,
        statement: impl Into<String>,
    ) -> Self {
        Self::Statement {
            status: status.into(),
            message: message.into(),
            statement: statement.into(),
        }
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Returns true if this is a connect error.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_))
    }

    /// Returns true if the connection was missing or unhealthy.
    #[must_use]
    pub const fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }

    /// Returns true if the statement text was empty.
    #[must_use]
    pub const fn is_empty_statement(&self) -> bool {
        matches!(self, Self::EmptyStatement)
    }

    /// Returns true if the server rejected a statement.
    #[must_use]
    pub const fn is_statement(&self) -> bool {
        matches!(self, Self::Statement { .. })
    }

    /// Returns true if a statement or parameter could not be encoded.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}

/// Result type alias for pgclient operations.
pub type Result<T> = std::result::Result<T, Error>;
