//! The value module holds the representation of a single stored value.
//!
//! Values are opaque to the store: anything `'static` can go in. The one
//! thing the store *does* care about is whether a value owns an external
//! resource it should release when the value's slot is overwritten, removed,
//! or reset. That capability is modeled as a closed check at construction
//! time: callers wrap their value in either [`Value::plain`] or
//! [`Value::disposable`], and the store branches on the tag at the disposal
//! points. Nothing forces stored values to implement any trait.

use crate::error::Result;
use std::any::Any;

/// Implemented by stored values that own an external resource (a file
/// descriptor, a buffer, an upstream connection) and want it released when
/// the store lets go of them.
///
/// `dispose` is invoked at most once per stored value, synchronously, in the
/// caller's context. It may fail; the store accepts the error but does not
/// inspect, propagate, retry, or log it, and its own bookkeeping proceeds
/// regardless. Treat disposal as best-effort.
pub trait Disposable: Any {
    /// Release whatever this value is holding.
    fn dispose(&mut self) -> Result<()>;
}

/// A single value held by the store, tagged by whether it can dispose of
/// itself. The tag is fixed at construction, so the capability check at
/// overwrite/remove/reset time is a plain match rather than a downcast.
pub enum Value {
    /// A value with no cleanup obligations
    Plain(Box<dyn Any>),
    /// A value that releases resources on disposal
    Disposable(Box<dyn Disposable>),
}

impl Value {
    /// Wrap a value with no disposal behavior.
    pub fn plain<T: Any>(val: T) -> Self {
        Self::Plain(Box::new(val))
    }

    /// Wrap a value that should have [`Disposable::dispose`] called on it
    /// when the store overwrites, removes, or resets it.
    pub fn disposable<T: Disposable>(val: T) -> Self {
        Self::Disposable(Box::new(val))
    }

    /// Whether this value carries the disposable capability.
    pub fn is_disposable(&self) -> bool {
        matches!(self, Self::Disposable(_))
    }

    /// Borrow the inner value for downcasting.
    pub fn as_any(&self) -> &dyn Any {
        match self {
            Self::Plain(v) => v.as_ref(),
            Self::Disposable(v) => v.as_ref(),
        }
    }

    /// Mutably borrow the inner value for downcasting. Note that this only
    /// exposes the interior, never the slot itself, so a caller cannot swap
    /// the value out from under the disposal contract.
    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        match self {
            Self::Plain(v) => v.as_mut(),
            Self::Disposable(v) => v.as_mut(),
        }
    }

    /// Downcast the inner value to a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Run disposal if this value supports it. The result of the value's own
    /// cleanup is accepted and ignored.
    pub(crate) fn dispose(&mut self) {
        if let Self::Disposable(v) = self {
            let _ = v.dispose();
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(_) => write!(f, "Value::Plain"),
            Self::Disposable(_) => write!(f, "Value::Disposable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Conn {
        closed: Rc<Cell<bool>>,
    }

    impl Disposable for Conn {
        fn dispose(&mut self) -> Result<()> {
            self.closed.set(true);
            Ok(())
        }
    }

    struct Grumpy;

    impl Disposable for Grumpy {
        fn dispose(&mut self) -> Result<()> {
            Err(Error::Dispose(String::from("not in the mood")))
        }
    }

    #[test]
    fn downcast() {
        let val = Value::plain(vec![1u8, 2, 3]);
        assert!(!val.is_disposable());
        assert_eq!(val.downcast_ref::<Vec<u8>>(), Some(&vec![1u8, 2, 3]));
        assert_eq!(val.downcast_ref::<String>(), None);

        let closed = Rc::new(Cell::new(false));
        let val = Value::disposable(Conn { closed: closed.clone() });
        assert!(val.is_disposable());
        assert!(val.downcast_ref::<Conn>().is_some());
        assert!(val.downcast_ref::<u64>().is_none());
    }

    #[test]
    fn downcast_mut() {
        let mut val = Value::plain(String::from("hi"));
        val.as_any_mut()
            .downcast_mut::<String>()
            .unwrap()
            .push_str(" there");
        assert_eq!(val.downcast_ref::<String>(), Some(&String::from("hi there")));
    }

    #[test]
    fn dispose_runs_once_wrapped() {
        let closed = Rc::new(Cell::new(false));
        let mut val = Value::disposable(Conn { closed: closed.clone() });
        assert!(!closed.get());
        val.dispose();
        assert!(closed.get());
    }

    #[test]
    fn dispose_failure_swallowed() {
        let mut val = Value::disposable(Grumpy);
        // does not panic, does not surface
        val.dispose();
    }

    #[test]
    fn plain_dispose_noop() {
        let mut val = Value::plain(42u32);
        val.dispose();
        assert_eq!(val.downcast_ref::<u32>(), Some(&42));
    }
}
