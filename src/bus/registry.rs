//! # Observer registry.
//!
//! Holds the observers of one bus core, keyed by [`ObserverId`]. Ids are
//! generated per `register` call, so registering the same observer twice
//! produces two entries that are removed independently.
//!
//! The registry is not synchronized; the owning core guards it with its lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio_util::sync::CancellationToken;

use crate::observers::ObserverRef;

/// Global counter for registration ids.
static OBSERVER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Handle identifying one registration.
///
/// Returned by `register`; callers don't need to keep it, the bus uses it to
/// remove exactly this registration when its context is cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    pub(crate) fn next() -> Self {
        Self(OBSERVER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One registration: the observer and the context scoping it.
struct Entry {
    observer: ObserverRef,
    ctx: CancellationToken,
}

/// Observers of one bus core.
///
/// Iteration order is unspecified.
#[derive(Default)]
pub(crate) struct Registry {
    observers: HashMap<ObserverId, Entry>,
}

impl Registry {
    pub(crate) fn insert(&mut self, id: ObserverId, observer: ObserverRef, ctx: CancellationToken) {
        self.observers.insert(id, Entry { observer, ctx });
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> Option<ObserverRef> {
        self.observers.remove(&id).map(|e| e.observer)
    }

    pub(crate) fn observers(&self) -> impl Iterator<Item = &ObserverRef> {
        self.observers.values().map(|e| &e.observer)
    }

    /// Every registration with its context, for re-arming a new watcher.
    pub(crate) fn scopes(&self) -> impl Iterator<Item = (ObserverId, &CancellationToken)> {
        self.observers.iter().map(|(id, e)| (*id, &e.ctx))
    }

    pub(crate) fn contains(&self, id: ObserverId) -> bool {
        self.observers.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRef;
    use crate::observers::ObserverFn;
    use std::sync::Arc;

    fn observer() -> ObserverRef {
        ObserverFn::arc(|_: &CancellationToken, _: &EventRef| {})
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ObserverId::next();
        let b = ObserverId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_same_observer_twice_is_two_entries() {
        let o = observer();
        let mut reg = Registry::default();
        let first = ObserverId::next();
        let second = ObserverId::next();
        let ctx = CancellationToken::new();
        reg.insert(first, Arc::clone(&o), ctx.clone());
        reg.insert(second, o, ctx.child_token());
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.scopes().count(), 2);

        assert!(reg.remove(first).is_some());
        assert!(!reg.contains(first));
        assert!(reg.contains(second));
        assert!(reg.remove(first).is_none());
        assert_eq!(reg.observers().count(), 1);
    }
}
