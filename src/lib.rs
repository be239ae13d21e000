//! This library provides request-scoped value storage for network servers:
//! middleware and handlers can stash arbitrary values on a connection/request
//! context by name and read them back later in the same request. Any stored
//! value that owns an external resource (a file descriptor, a buffer, an
//! upstream connection) is released deterministically when it is overwritten,
//! removed, or when the whole store is reset so the context can be handed
//! back to its pool.
//!
//! The store is meant to be owned by exactly one request-handling task at a
//! time, so there is no internal locking. All operations are synchronous and
//! bounded by the (small) number of entries.
//!
//! This library does not know anything about requests, sockets, or pooling.
//! It is up to the layer above to decide when a request's lifetime ends and
//! call [`UserData::reset`][store::UserData::reset] before reuse.

pub mod error;
pub mod store;
pub mod value;

pub use store::UserData;
pub use value::{Disposable, Value};
