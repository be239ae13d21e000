//! The main error enum for the project lives here, and documents the various
//! conditions that can arise while interacting with the system.
//!
//! The store itself never fails: absent keys return `None` and removing or
//! resetting an empty store is a no-op. These errors exist for
//! [`Disposable`][crate::value::Disposable] implementors to report problems
//! releasing their resources. The store accepts such an error but does not
//! act on it.

use thiserror::Error;

/// This is our error enum. It contains an entry for any part of the system in
/// which an expectation is not met or a problem occurs.
#[derive(Error, Debug)]
pub enum Error {
    /// A stored value failed to release its resources
    #[error("Error disposing stored value: {0}")]
    Dispose(String),

    /// IO error while releasing a resource (file descriptors, sockets, ...)
    #[error("IO error while disposing stored value: {0}")]
    Io(#[from] std::io::Error),
}

/// Wraps `std::result::Result` around our `Error` enum
pub type Result<T> = std::result::Result<T, Error>;
