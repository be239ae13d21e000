//! The store module holds [`UserData`], the request-scoped key/value
//! container itself.
//!
//! Keys are canonically byte sequences. The textual entry points (`set`,
//! `get`, `remove`) convert at the boundary and delegate to the byte
//! variants, so key equality is defined exactly once: two keys are the same
//! key when their bytes are equal, no matter which form they arrived in.
//!
//! Entries live in a flat `Vec` and lookups are a linear scan. With typical
//! per-request entry counts in the single digits to low tens, hashing
//! overhead and auxiliary index structures cost more than they save at this
//! scale, and a `Vec` keeps memory reuse across [`UserData::reset`] cycles
//! straightforward (clear keeps capacity). See `benches/store.rs`.

use crate::value::Value;
use getset::{CopyGetters, Getters, MutGetters};
use tracing::trace;

/// Operation counters for a single store, covering its whole lifetime
/// (counters survive [`UserData::reset`], since a pooled store serves many
/// requests).
#[derive(Clone, Debug, Default, CopyGetters, MutGetters)]
#[getset(get_copy = "pub", get_mut)]
pub struct UserDataMetrics {
    /// Number of set operations (both key forms)
    sets: u64,
    /// Number of sets that replaced an existing entry
    overwrites: u64,
    /// Number of removes that found their entry
    removes: u64,
    /// Number of disposal invocations triggered by overwrite/remove/reset
    disposals: u64,
    /// Number of resets
    resets: u64,
}

/// One key/value pair held by the store.
#[derive(Debug)]
struct Entry {
    key: Vec<u8>,
    value: Value,
}

/// Request-scoped value storage. Owned by exactly one request-handling task
/// at a time; no internal locking.
///
/// The zero value is valid: `UserData::default()` is an empty, usable store
/// with no allocation behind it. The surrounding context pool is expected to
/// call [`reset`][UserData::reset] between requests, which disposes every
/// disposable value and empties the store while keeping its capacity.
#[derive(Debug, Default, Getters)]
pub struct UserData {
    entries: Vec<Entry>,
    /// Our heroic store metrics
    #[getset(get = "pub")]
    metrics: UserDataMetrics,
}

impl UserData {
    /// Create a new empty `UserData` store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store `value` under a textual key. Identical to
    /// [`set_bytes`][UserData::set_bytes] with the key's UTF-8 bytes.
    pub fn set(&mut self, key: &str, value: Value) {
        self.set_bytes(key.as_bytes(), value);
    }

    /// Store `value` under a byte-sequence key.
    ///
    /// If an entry with a byte-equal key already exists, its current value is
    /// disposed (if disposable) and then replaced in place, preserving the
    /// entry's slot. Otherwise a new entry is appended. Never fails.
    #[tracing::instrument(skip(self, value))]
    pub fn set_bytes(&mut self, key: &[u8], value: Value) {
        let Self { entries, metrics } = self;
        *metrics.sets_mut() += 1;
        if let Some(entry) = entries.iter_mut().find(|e| e.key == key) {
            trace!(
                "UserData::set_bytes() -- overwrite key {}",
                String::from_utf8_lossy(key)
            );
            Self::dispose_counted(metrics, &mut entry.value);
            entry.value = value;
            *metrics.overwrites_mut() += 1;
            return;
        }
        trace!(
            "UserData::set_bytes() -- append key {}",
            String::from_utf8_lossy(key)
        );
        entries.push(Entry {
            key: key.to_vec(),
            value,
        });
    }

    /// Fetch the value stored under a textual key, or `None` if the key is
    /// absent. Never disposes, never mutates.
    pub fn get(&self, key: &str) -> Option<&dyn std::any::Any> {
        self.get_bytes(key.as_bytes())
    }

    /// Fetch the value stored under a byte-sequence key, or `None` if the
    /// key is absent. Equivalent to [`get`][UserData::get] for keys with the
    /// same byte content.
    pub fn get_bytes(&self, key: &[u8]) -> Option<&dyn std::any::Any> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_any())
    }

    /// Mutably borrow the value stored under a textual key. Only the value's
    /// interior is exposed, so the disposal contract cannot be bypassed.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut dyn std::any::Any> {
        self.get_bytes_mut(key.as_bytes())
    }

    /// Mutably borrow the value stored under a byte-sequence key.
    pub fn get_bytes_mut(&mut self, key: &[u8]) -> Option<&mut dyn std::any::Any> {
        self.entries
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| e.value.as_any_mut())
    }

    /// Remove the entry stored under a textual key, disposing its value if
    /// disposable. No-op when the key is absent.
    pub fn remove(&mut self, key: &str) {
        self.remove_bytes(key.as_bytes());
    }

    /// Remove the entry stored under a byte-sequence key, disposing its
    /// value if disposable. No-op when the key is absent.
    ///
    /// The relative order of the remaining entries is not preserved (the
    /// last entry backfills the vacated slot), but every surviving key stays
    /// reachable through [`get`][UserData::get]/[`get_bytes`][UserData::get_bytes].
    #[tracing::instrument(skip(self))]
    pub fn remove_bytes(&mut self, key: &[u8]) {
        let Some(idx) = self.entries.iter().position(|e| e.key == key) else {
            return;
        };
        trace!(
            "UserData::remove_bytes() -- remove key {}",
            String::from_utf8_lossy(key)
        );
        // dispose first, then vacate the slot
        Self::dispose_counted(&mut self.metrics, &mut self.entries[idx].value);
        self.entries.swap_remove(idx);
        *self.metrics.removes_mut() += 1;
    }

    /// Dispose every disposable value (once per entry) and empty the store,
    /// keeping the backing capacity for the next request. After this, every
    /// previously stored key reads back as absent and the store behaves like
    /// a freshly constructed one.
    #[tracing::instrument(skip(self))]
    pub fn reset(&mut self) {
        trace!("UserData::reset() -- clearing {} entries", self.entries.len());
        for entry in self.entries.iter_mut() {
            Self::dispose_counted(&mut self.metrics, &mut entry.value);
        }
        // clear() keeps the backing capacity for the next request
        self.entries.clear();
        *self.metrics.resets_mut() += 1;
    }

    /// Run disposal on a value and keep the count honest. The value's own
    /// cleanup result is accepted and ignored; bookkeeping proceeds
    /// regardless of the outcome.
    fn dispose_counted(metrics: &mut UserDataMetrics, value: &mut Value) {
        if value.is_disposable() {
            *metrics.disposals_mut() += 1;
            value.dispose();
        }
    }
}
