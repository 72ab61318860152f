//! Owning wrapper around a libpq session.
//!
//! A [`Connection`] holds at most one `PGconn` and closes it on drop
//! or replacement, so a session always has exactly one owner. The raw
//! pointer field keeps the type `!Send`/`!Sync`; libpq allows at most
//! one in-flight operation per session, and this wrapper inherits that
//! discipline by staying on one thread.

use std::ffi::{CStr, CString};
use std::ptr::NonNull;

use pq_sys::{ConnStatusType, ExecStatusType, PGconn};

use crate::error::{Error, Result};
use crate::result::PgResult;

/// Error text reported when no session is held.
const NO_CONNECTION: &str = "no connection established";

/// Handle for one live database session.
#[derive(Debug, Default)]
pub struct Connection {
    conn: Option<NonNull<PGconn>>,
}

impl Connection {
    /// Create an empty, disconnected handle.
    #[must_use]
    pub const fn new() -> Self {
        Self { conn: None }
    }

    /// Open a session and return a connected handle.
    pub fn establish(conninfo: &str) -> Result<Self> {
        let mut connection = Self::new();
        connection.connect(conninfo)?;
        Ok(connection)
    }

    /// Open a new session from a `key=value` conninfo string.
    ///
    /// Any previously held session is closed first, so repeated calls
    /// are safe. On failure the partially opened session is released
    /// and the driver's error text is returned.
    pub fn connect(&mut self, conninfo: &str) -> Result<()> {
        self.disconnect();
        let conninfo = CString::new(conninfo)
            .map_err(|_| Error::invalid_parameter("conninfo contains a NUL byte"))?;
        let raw = unsafe { pq_sys::PQconnectdb(conninfo.as_ptr()) };
        let Some(conn) = NonNull::new(raw) else {
            // Null only on allocation failure inside libpq.
            return Err(Error::connect("libpq could not allocate a connection"));
        };
        if unsafe { pq_sys::PQstatus(conn.as_ptr()) } != ConnStatusType::CONNECTION_OK {
            let message = error_text(conn);
            unsafe { pq_sys::PQfinish(conn.as_ptr()) };
            tracing::error!(error = %message, "connection failed");
            return Err(Error::connect(message));
        }
        tracing::debug!("connected to database");
        self.conn = Some(conn);
        Ok(())
    }

    /// Close the session if one is held. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            unsafe { pq_sys::PQfinish(conn.as_ptr()) };
        }
    }

    /// True iff a session reference is held, regardless of health.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// True iff a session is held and its status is healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.conn
            .is_some_and(|conn| unsafe { pq_sys::PQstatus(conn.as_ptr()) } == ConnStatusType::CONNECTION_OK)
    }

    /// Driver-reported connection status; `CONNECTION_BAD` when no
    /// session is held.
    #[must_use]
    pub fn status(&self) -> ConnStatusType {
        self.conn.map_or(ConnStatusType::CONNECTION_BAD, |conn| unsafe {
            pq_sys::PQstatus(conn.as_ptr())
        })
    }

    /// The driver's last error text, or a fixed sentinel when no
    /// session exists.
    #[must_use]
    pub fn last_error(&self) -> String {
        self.conn
            .map_or_else(|| NO_CONNECTION.to_string(), error_text)
    }

    /// Issue `BEGIN`.
    pub fn begin(&self) -> Result<()> {
        self.execute_control("BEGIN")
    }

    /// Issue `COMMIT`.
    pub fn commit(&self) -> Result<()> {
        self.execute_control("COMMIT")
    }

    /// Issue `ROLLBACK`.
    pub fn rollback(&self) -> Result<()> {
        self.execute_control("ROLLBACK")
    }

    /// The raw session pointer, still owned by this handle.
    pub(crate) fn raw(&self) -> Option<NonNull<PGconn>> {
        self.conn
    }

    /// Run a transaction-control statement, releasing its native
    /// result on every path.
    fn execute_control(&self, command: &str) -> Result<()> {
        if !self.is_ok() {
            return Err(Error::NotConnected);
        }
        let conn = self.conn.ok_or(Error::NotConnected)?;
        let command_c = CString::new(command)
            .map_err(|_| Error::invalid_parameter("control statement contains a NUL byte"))?;
        let raw = unsafe { pq_sys::PQexec(conn.as_ptr(), command_c.as_ptr()) };
        match unsafe { PgResult::from_raw(raw) } {
            Some(result) if result.status() == ExecStatusType::PGRES_COMMAND_OK => Ok(()),
            Some(result) => {
                let status = result.status_str();
                let message = self.last_error();
                tracing::error!(status = %status, error = %message, command, "transaction control failed");
                Err(Error::statement(status, message, command))
            }
            None => Err(Error::statement("no result", self.last_error(), command)),
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Read and trim the driver's error message for a session.
fn error_text(conn: NonNull<PGconn>) -> String {
    let message = unsafe { pq_sys::PQerrorMessage(conn.as_ptr()) };
    if message.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_is_disconnected() {
        let connection = Connection::new();
        assert!(!connection.is_connected());
        assert!(!connection.is_ok());
        assert_eq!(connection.status(), ConnStatusType::CONNECTION_BAD);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut connection = Connection::new();
        connection.disconnect();
        connection.disconnect();
        assert!(!connection.is_connected());
    }

    #[test]
    fn test_last_error_sentinel_without_session() {
        let connection = Connection::new();
        assert_eq!(connection.last_error(), "no connection established");
    }

    #[test]
    fn test_transaction_control_requires_session() {
        let connection = Connection::new();
        assert!(connection.begin().unwrap_err().is_not_connected());
        assert!(connection.commit().unwrap_err().is_not_connected());
        assert!(connection.rollback().unwrap_err().is_not_connected());
    }
}
