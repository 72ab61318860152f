//! Connection lifecycle.
//!
//! Provides:
//! - [`Connection`]: owning wrapper for one libpq session
//! - [`ConnectParams`]: conninfo string builder with env loading

pub mod params;
pub mod wrapper;

pub use params::ConnectParams;
pub use wrapper::Connection;
