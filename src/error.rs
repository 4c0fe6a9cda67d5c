//! Error and result aliases used throughout the crate.
//!
//! Engine failures are reserved for caller or configuration bugs (an unknown range symbol, a
//! non-finite goal) and for I/O. Malformed values inside a CSV row never produce an error.

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
