//! Owning guard for a native `PGresult` handle.
//!
//! Whatever produces a raw result pointer must wrap it here
//! immediately: the guard frees the handle exactly once, on every exit
//! path. Ownership can be detached with [`PgResult::into_raw`] when a
//! longer-lived holder takes over; there is never more than one owner.

use std::ffi::CStr;
use std::os::raw::c_int;
use std::ptr::NonNull;

use pq_sys::{ExecStatusType, PGresult};

/// Owned native result handle, freed via `PQclear` on drop.
///
/// Move-only; the raw pointer field keeps it `!Send`/`!Sync`, matching
/// the single-threaded session model.
#[derive(Debug)]
pub struct PgResult {
    res: NonNull<PGresult>,
}

impl PgResult {
    /// Take ownership of a raw result pointer.
    ///
    /// Returns `None` for a null pointer (libpq returns null on
    /// out-of-memory).
    ///
    /// # Safety
    ///
    /// `raw` must be a `PGresult` pointer obtained from libpq that no
    /// other owner will free.
    #[must_use]
    pub unsafe fn from_raw(raw: *mut PGresult) -> Option<Self> {
        NonNull::new(raw).map(|res| Self { res })
    }

    /// The raw pointer, still owned by the guard.
    #[must_use]
    pub const fn as_ptr(&self) -> *mut PGresult {
        self.res.as_ptr()
    }

    /// Detach ownership without freeing.
    ///
    /// The caller becomes responsible for `PQclear`.
    #[must_use]
    pub fn into_raw(self) -> NonNull<PGresult> {
        let res = self.res;
        std::mem::forget(self);
        res
    }

    /// Server status of this result.
    #[must_use]
    pub fn status(&self) -> ExecStatusType {
        unsafe { pq_sys::PQresultStatus(self.res.as_ptr()) }
    }

    /// Human-readable status name, e.g. `PGRES_TUPLES_OK`.
    #[must_use]
    pub fn status_str(&self) -> String {
        let status = self.status();
        // PQresStatus returns a pointer into a static table.
        let text = unsafe { pq_sys::PQresStatus(status) };
        if text.is_null() {
            return format!("{status:?}");
        }
        unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned()
    }

    /// True for the two terminal success statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self.status(),
            ExecStatusType::PGRES_COMMAND_OK | ExecStatusType::PGRES_TUPLES_OK
        )
    }

    /// Number of rows in the result.
    #[must_use]
    pub fn ntuples(&self) -> usize {
        let count = unsafe { pq_sys::PQntuples(self.res.as_ptr()) };
        usize::try_from(count).unwrap_or(0)
    }

    /// Number of columns in the result.
    #[must_use]
    pub fn nfields(&self) -> usize {
        let count = unsafe { pq_sys::PQnfields(self.res.as_ptr()) };
        usize::try_from(count).unwrap_or(0)
    }

    /// Column name at the given index, in server-reported order.
    #[must_use]
    pub fn column_name(&self, index: usize) -> Option<String> {
        if index >= self.nfields() {
            return None;
        }
        let name = unsafe { pq_sys::PQfname(self.res.as_ptr(), index as c_int) };
        if name.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
    }

    /// Cell text at `(row, col)`.
    ///
    /// Returns `None` for SQL NULL and for out-of-range coordinates; a
    /// literal empty string comes back as `Some("")`.
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> Option<String> {
        if row >= self.ntuples() || col >= self.nfields() {
            return None;
        }
        let row = row as c_int;
        let col = col as c_int;
        if unsafe { pq_sys::PQgetisnull(self.res.as_ptr(), row, col) } != 0 {
            return None;
        }
        let value = unsafe { pq_sys::PQgetvalue(self.res.as_ptr(), row, col) };
        if value.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned())
    }

    /// Server-reported affected-row count for a command result.
    ///
    /// Defaults to 0 when absent or unparseable (e.g. DDL statements,
    /// which report an empty string).
    #[must_use]
    pub fn command_tuples(&self) -> u64 {
        let text = unsafe { pq_sys::PQcmdTuples(self.res.as_ptr()) };
        if text.is_null() {
            return 0;
        }
        unsafe { CStr::from_ptr(text) }
            .to_string_lossy()
            .trim()
            .parse()
            .unwrap_or(0)
    }
}

impl Drop for PgResult {
    fn drop(&mut self) {
        unsafe { pq_sys::PQclear(self.res.as_ptr()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_null_is_none() {
        let guard = unsafe { PgResult::from_raw(std::ptr::null_mut()) };
        assert!(guard.is_none());
    }
}
