//! Class identifiers.
//!
//! Every [`Class`](crate::model::Class) receives a [`ClassId`] when it is
//! constructed. Ids are handed out by an [`IdGenerator`] that is owned by the
//! caller, so independent model-building runs never share a counter while all
//! source units of one run still get distinct ids.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::Serialize;

/// Stable identifier of a class within one model-building run.
///
/// # Examples
///
/// ```
/// use solscope_core::identifier::{ClassId, IdGenerator};
///
/// let ids = IdGenerator::new();
/// let first = ids.next_id();
/// let second = ids.next_id();
///
/// assert_eq!(first, ClassId::new(0));
/// assert!(second > first);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClassId(u64);

impl ClassId {
    /// Creates a `ClassId` from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic generator of [`ClassId`]s.
///
/// The counter is atomic so a generator can be shared by reference between
/// builders running on different threads.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Creates a generator whose first id is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Returns a fresh id. Ids are never reused.
    pub fn next_id(&self) -> ClassId {
        ClassId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
