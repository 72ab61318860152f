//! Statement execution against a borrowed connection.
//!
//! Every execution path funnels through one status classification:
//! `PGRES_COMMAND_OK` and `PGRES_TUPLES_OK` are success, anything else
//! releases the native result and surfaces a [`Error::Statement`] with
//! the status text, the driver error text, and the offending
//! statement.

use std::borrow::Cow;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

use pq_sys::PGresult;

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::result::PgResult;

/// Textual value of a positional statement parameter.
///
/// Parameters are always sent in text format and the server infers
/// their types. `None` stands for SQL NULL.
pub trait ToSqlText {
    /// The parameter's text, or `None` for SQL NULL.
    fn to_sql_text(&self) -> Option<Cow<'_, str>>;
}

impl ToSqlText for &str {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl ToSqlText for String {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl<T: ToSqlText> ToSqlText for Option<T> {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(ToSqlText::to_sql_text)
    }
}

impl ToSqlText for bool {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "true" } else { "false" }))
    }
}

macro_rules! to_sql_text_via_display {
    ($($ty:ty),+) => {
        $(impl ToSqlText for $ty {
            fn to_sql_text(&self) -> Option<Cow<'_, str>> {
                Some(Cow::Owned(self.to_string()))
            }
        })+
    };
}

to_sql_text_via_display!(i16, i32, i64, u16, u32, u64, f32, f64);

/// Statement executor borrowing one [`Connection`].
///
/// Construction is the only fatal path: a `Query` cannot exist without
/// a usable connection. Each call re-checks connection health, so a
/// session that died after construction fails fast instead of handing
/// libpq a dead handle.
#[derive(Debug)]
pub struct Query<'conn> {
    conn: &'conn Connection,
}

impl<'conn> Query<'conn> {
    /// Borrow a healthy connection.
    ///
    /// Fails with [`Error::NotConnected`] when the connection is
    /// missing or unhealthy.
    pub fn new(conn: &'conn Connection) -> Result<Self> {
        if !conn.is_ok() {
            return Err(Error::NotConnected);
        }
        Ok(Self { conn })
    }

    /// Execute a statement verbatim.
    pub fn execute(&self, sql: &str) -> Result<PgResult> {
        self.check_ready(sql)?;
        let sql_c = c_string(sql)?;
        let conn = self.conn.raw().ok_or(Error::NotConnected)?;
        let raw = unsafe { pq_sys::PQexec(conn.as_ptr(), sql_c.as_ptr()) };
        self.classify(raw, sql)
    }

    /// Execute a statement with `$n` positional parameters.
    ///
    /// Accepts any parameter collection whose elements implement
    /// [`ToSqlText`], so owned strings, borrowed strings, and
    /// `Option`s (SQL NULL) all work.
    pub fn execute_params<P: ToSqlText>(&self, sql: &str, params: &[P]) -> Result<PgResult> {
        self.check_ready(sql)?;
        let sql_c = c_string(sql)?;
        let (owned, ptrs) = encode_params(params)?;
        let conn = self.conn.raw().ok_or(Error::NotConnected)?;
        let raw = unsafe {
            pq_sys::PQexecParams(
                conn.as_ptr(),
                sql_c.as_ptr(),
                ptrs.len() as c_int,
                ptr::null(), // let the server infer parameter types
                if ptrs.is_empty() { ptr::null() } else { ptrs.as_ptr() },
                ptr::null(), // text parameters carry no lengths
                ptr::null(), // all parameters in text format
                0,           // text result format
            )
        };
        drop(owned);
        self.classify(raw, sql)
    }

    /// Register a named server-side prepared statement.
    pub fn prepare(&self, name: &str, sql: &str) -> Result<()> {
        self.check_ready(sql)?;
        if name.is_empty() {
            return Err(Error::EmptyStatement);
        }
        let name_c = c_string(name)?;
        let sql_c = c_string(sql)?;
        let conn = self.conn.raw().ok_or(Error::NotConnected)?;
        let raw = unsafe {
            pq_sys::PQprepare(conn.as_ptr(), name_c.as_ptr(), sql_c.as_ptr(), 0, ptr::null())
        };
        self.classify(raw, sql).map(drop)
    }

    /// Invoke a previously prepared statement by name.
    pub fn execute_prepared<P: ToSqlText>(&self, name: &str, params: &[P]) -> Result<PgResult> {
        self.check_ready(name)?;
        let name_c = c_string(name)?;
        let (owned, ptrs) = encode_params(params)?;
        let conn = self.conn.raw().ok_or(Error::NotConnected)?;
        let raw = unsafe {
            pq_sys::PQexecPrepared(
                conn.as_ptr(),
                name_c.as_ptr(),
                ptrs.len() as c_int,
                if ptrs.is_empty() { ptr::null() } else { ptrs.as_ptr() },
                ptr::null(),
                ptr::null(),
                0,
            )
        };
        drop(owned);
        self.classify(raw, name)
    }

    /// Execute and discard the result.
    pub fn execute_command(&self, sql: &str) -> Result<()> {
        self.execute(sql).map(drop)
    }

    /// Execute and parse the first cell as an integer, falling back to
    /// `default` on failure, empty result, NULL, or a parse error.
    pub fn execute_int(&self, sql: &str, default: i64) -> i64 {
        match self.first_cell(sql) {
            Some(text) => text.trim().parse().unwrap_or_else(|error| {
                tracing::debug!(value = %text, error = %error, "result cell failed to parse, using default");
                default
            }),
            None => default,
        }
    }

    /// Execute and return the first cell's text, falling back to
    /// `default` on failure, empty result, or NULL.
    pub fn execute_string(&self, sql: &str, default: &str) -> String {
        self.first_cell(sql)
            .unwrap_or_else(|| default.to_string())
    }

    /// Health of the borrowed connection.
    #[must_use]
    pub fn is_connection_ok(&self) -> bool {
        self.conn.is_ok()
    }

    /// The borrowed connection's last error text.
    #[must_use]
    pub fn last_error(&self) -> String {
        self.conn.last_error()
    }

    /// Shared precondition check: healthy connection, non-empty text.
    fn check_ready(&self, sql: &str) -> Result<()> {
        if !self.conn.is_ok() {
            return Err(Error::NotConnected);
        }
        if sql.is_empty() {
            return Err(Error::EmptyStatement);
        }
        Ok(())
    }

    /// Two-outcome status classification shared by every execution
    /// path. A failed result is released here before the error is
    /// returned.
    fn classify(&self, raw: *mut PGresult, statement: &str) -> Result<PgResult> {
        match unsafe { PgResult::from_raw(raw) } {
            Some(result) if result.is_success() => Ok(result),
            Some(result) => {
                let status = result.status_str();
                let message = self.conn.last_error();
                tracing::error!(status = %status, error = %message, statement, "statement failed");
                Err(Error::statement(status, message, statement))
            }
            None => {
                let message = self.conn.last_error();
                tracing::error!(error = %message, statement, "driver returned no result");
                Err(Error::statement("no result", message, statement))
            }
        }
    }

    /// First cell of the first row, `None` on any failure or NULL.
    fn first_cell(&self, sql: &str) -> Option<String> {
        let result = self.execute(sql).ok()?;
        if result.ntuples() > 0 && result.nfields() > 0 {
            result.value(0, 0)
        } else {
            None
        }
    }
}

/// Convert statement or name text to a C string, rejecting interior
/// NUL bytes.
fn c_string(text: &str) -> Result<CString> {
    CString::new(text).map_err(|_| Error::invalid_parameter("statement contains a NUL byte"))
}

/// Encode parameters as C strings plus the pointer array libpq wants;
/// null pointers stand for SQL NULL. The owned strings must outlive
/// the driver call.
fn encode_params<P: ToSqlText>(params: &[P]) -> Result<(Vec<Option<CString>>, Vec<*const c_char>)> {
    let owned = params
        .iter()
        .map(|param| {
            param
                .to_sql_text()
                .map(|text| {
                    CString::new(text.into_owned())
                        .map_err(|_| Error::invalid_parameter("parameter contains a NUL byte"))
                })
                .transpose()
        })
        .collect::<Result<Vec<Option<CString>>>>()?;
    let ptrs = owned
        .iter()
        .map(|param| param.as_ref().map_or(ptr::null(), |text| text.as_ptr()))
        .collect();
    Ok((owned, ptrs))
}
