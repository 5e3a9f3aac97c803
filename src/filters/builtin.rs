//! Ready-made text filters.
//!
//! All of them pass [`End`](crate::End) through so a downstream bus ends when
//! the upstream does. Non-text events are dropped.

use std::sync::{Arc, Mutex, PoisonError};

use super::filter::FilterRef;
use super::map::map;
use crate::bus::Emitter;
use crate::events::{is_end, Text};

/// Forwards text events whose length in characters equals `n`.
pub fn len_eq(n: usize) -> FilterRef {
    map(move |ctx, em, ev| {
        let keep = match ev.downcast_ref::<Text>() {
            Some(t) => t.as_str().chars().count() == n,
            None => is_end(ev.as_ref()),
        };
        if keep {
            em.emit(ctx, Arc::clone(ev));
        }
    })
}

/// Forwards text events starting with `prefix`.
pub fn prefix(prefix: impl Into<String>) -> FilterRef {
    let prefix = prefix.into();
    map(move |ctx, em, ev| {
        let keep = match ev.downcast_ref::<Text>() {
            Some(t) => t.as_str().starts_with(&prefix),
            None => is_end(ev.as_ref()),
        };
        if keep {
            em.emit(ctx, Arc::clone(ev));
        }
    })
}

/// Emits the running concatenation of all text seen so far.
///
/// `"a"`, `"b"`, `"c"` in gives `"a"`, `"ab"`, `"abc"` out.
pub fn concat() -> FilterRef {
    let acc = Mutex::new(String::new());
    map(move |ctx, em, ev| {
        if is_end(ev.as_ref()) {
            em.emit(ctx, Arc::clone(ev));
            return;
        }
        let Some(t) = ev.downcast_ref::<Text>() else {
            return;
        };
        let joined = {
            let mut acc = acc.lock().unwrap_or_else(PoisonError::into_inner);
            acc.push_str(t.as_str());
            acc.clone()
        };
        em.emit(ctx, Text::arc(joined));
    })
}
