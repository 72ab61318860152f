//! Connection parameter builder.
//!
//! Renders the libpq `key=value` conninfo string from individual
//! parameters, quoting values where the conninfo grammar requires it.
//! Parameters left unset are omitted so libpq's own defaults (compiled
//! defaults, service files, environment) still apply.

use std::borrow::Cow;
use std::env;
use std::fmt;

/// Environment variable names recognized by [`ConnectParams::from_env`].
///
/// These are the standard libpq variables, read here explicitly so the
/// rendered conninfo is complete and self-describing.
mod vars {
    pub const PGHOST: &str = "PGHOST";
    pub const PGPORT: &str = "PGPORT";
    pub const PGDATABASE: &str = "PGDATABASE";
    pub const PGUSER: &str = "PGUSER";
    pub const PGPASSWORD: &str = "PGPASSWORD";
}

/// Builder for a libpq connection string.
///
/// # Example
///
/// ```
/// use pgclient::ConnectParams;
///
/// let conninfo = ConnectParams::new()
///     .host("localhost")
///     .port(5432)
///     .dbname("app")
///     .user("app")
///     .password("secret")
///     .to_conninfo();
/// assert_eq!(
///     conninfo,
///     "host=localhost port=5432 dbname=app user=app password=secret"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectParams {
    host: Option<String>,
    port: Option<u16>,
    dbname: Option<String>,
    user: Option<String>,
    password: Option<String>,
}

impl ConnectParams {
    /// Create an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            host: None,
            port: None,
            dbname: None,
            user: None,
            password: None,
        }
    }

    /// Load parameters from the standard `PG*` environment variables.
    ///
    /// Unset or unparseable variables are skipped.
    #[must_use]
    pub fn from_env() -> Self {
        let mut params = Self::new();
        if let Ok(host) = env::var(vars::PGHOST) {
            params.host = Some(host);
        }
        if let Ok(port) = env::var(vars::PGPORT)
            && let Ok(port) = port.parse::<u16>()
        {
            params.port = Some(port);
        }
        if let Ok(dbname) = env::var(vars::PGDATABASE) {
            params.dbname = Some(dbname);
        }
        if let Ok(user) = env::var(vars::PGUSER) {
            params.user = Some(user);
        }
        if let Ok(password) = env::var(vars::PGPASSWORD) {
            params.password = Some(password);
        }
        params
    }

    /// Set the server host name or socket directory.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the server port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the database name.
    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = Some(dbname.into());
        self
    }

    /// Set the user name.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Render the space-separated `key=value` conninfo string.
    #[must_use]
    pub fn to_conninfo(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref host) = self.host {
            parts.push(format!("host={}", quote(host)));
        }
        if let Some(port) = self.port {
            parts.push(format!("port={port}"));
        }
        if let Some(ref dbname) = self.dbname {
            parts.push(format!("dbname={}", quote(dbname)));
        }
        if let Some(ref user) = self.user {
            parts.push(format!("user={}", quote(user)));
        }
        if let Some(ref password) = self.password {
            parts.push(format!("password={}", quote(password)));
        }
        parts.join(" ")
    }
}

impl fmt::Display for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_conninfo())
    }
}

/// Quote a conninfo value when the grammar requires it.
///
/// Values containing spaces, quotes, or backslashes (or empty values)
/// are single-quoted with `\'` and `\\` escapes.
fn quote(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && !value.contains([' ', '\'', '\\']) {
        return Cow::Borrowed(value);
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    Cow::Owned(format!("'{escaped}'"))
}
