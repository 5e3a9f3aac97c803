//! # Map: a filter driven by a transform function.
//!
//! [`Map`] owns one fresh bus. Every inbound event is handed to the transform
//! together with the bus's emitter; whatever the transform emits fans out to
//! the observers registered on the map.
//!
//! ```text
//! upstream ──► Map::on_event ──► transform(ctx, emitter, ev) ──► emit 0..n ──► downstream
//! ```
//!
//! The transform runs synchronously inside the upstream `emit`, with the
//! upstream lock held. A chain of `n` maps therefore holds `n` locks and `n`
//! stack frames for the duration of a single `emit`.
//!
//! ## Example
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use std::sync::{Arc, Mutex};
//! use tokio_util::sync::CancellationToken;
//! use voyeur::{map, pair, Emitter, EventRef, Observable, ObserverFn, Text};
//!
//! let ctx = CancellationToken::new();
//! let (em, o) = pair();
//!
//! // Upper-cases text events, drops the rest.
//! let upper = map(|ctx, em, ev| {
//!     if let Some(t) = ev.downcast_ref::<Text>() {
//!         em.emit(ctx, Text::arc(t.as_str().to_uppercase()));
//!     }
//! });
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! o.pipe(ctx.clone(), upper).register(
//!     ctx.clone(),
//!     ObserverFn::arc(move |_: &CancellationToken, ev: &EventRef| {
//!         sink.lock().unwrap().push(ev.downcast_ref::<Text>().unwrap().to_string());
//!     }),
//! );
//!
//! em.emit(&ctx, Text::arc("abc"));
//! assert_eq!(*seen.lock().unwrap(), vec!["ABC"]);
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::filter::FilterRef;
use crate::bus::{pair_with, BusConfig, BusEmitter, BusObservable, Emitter, Observable, ObserverId};
use crate::events::EventRef;
use crate::observers::{Observer, ObserverRef};

/// Transform signature: `(ctx, emitter, event)`.
pub type Transform = dyn Fn(&CancellationToken, &dyn Emitter, &EventRef) + Send + Sync;

/// Filter that applies a transform to every event.
pub struct Map {
    em: BusEmitter,
    o: BusObservable,
    transform: Box<Transform>,
}

impl Map {
    /// Creates a map over a fresh bus labeled `"map"`.
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&CancellationToken, &dyn Emitter, &EventRef) + Send + Sync + 'static,
    {
        Self::with_config(BusConfig::labeled("map"), transform)
    }

    /// Creates a map over a fresh bus built from `cfg`.
    pub fn with_config<F>(cfg: BusConfig, transform: F) -> Self
    where
        F: Fn(&CancellationToken, &dyn Emitter, &EventRef) + Send + Sync + 'static,
    {
        let (em, o) = pair_with(cfg);
        Self {
            em,
            o,
            transform: Box::new(transform),
        }
    }

    /// Creates the map and returns it as a shared handle.
    pub fn arc<F>(transform: F) -> Arc<Self>
    where
        F: Fn(&CancellationToken, &dyn Emitter, &EventRef) + Send + Sync + 'static,
    {
        Arc::new(Self::new(transform))
    }

    /// Returns the observable side of the internal bus.
    pub fn observable(&self) -> &BusObservable {
        &self.o
    }
}

impl Observer for Map {
    fn on_event(&self, ctx: &CancellationToken, event: &EventRef) {
        (self.transform)(ctx, &self.em, event);
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

impl Observable for Map {
    fn register(&self, ctx: CancellationToken, observer: ObserverRef) -> ObserverId {
        self.o.register(ctx, observer)
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map").field("bus", &self.o.label()).finish()
    }
}

/// Builds a filter from a transform function.
pub fn map<F>(transform: F) -> FilterRef
where
    F: Fn(&CancellationToken, &dyn Emitter, &EventRef) + Send + Sync + 'static,
{
    Map::arc(transform)
}

/// Filter that ignores every event.
pub fn noop() -> FilterRef {
    map(|_, _, _| {})
}

/// Filter that re-emits every event unchanged.
pub fn fwd() -> FilterRef {
    map(|ctx, em, ev| em.emit(ctx, Arc::clone(ev)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::pair;
    use crate::events::{end, is_end, Text};
    use crate::observers::ObserverFn;
    use std::sync::Mutex;

    fn collector() -> (Arc<Mutex<Vec<EventRef>>>, ObserverRef) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let o: ObserverRef = ObserverFn::arc(move |_: &CancellationToken, ev: &EventRef| {
            sink.lock().unwrap().push(Arc::clone(ev));
        });
        (seen, o)
    }

    #[tokio::test]
    async fn test_fwd_reproduces_input() {
        let ctx = CancellationToken::new();
        let (em, o) = pair();
        let (seen, sink) = collector();
        o.pipe(ctx.clone(), fwd()).register(ctx.clone(), sink);

        let input: Vec<EventRef> = (0..20).map(|i| Text::arc(i.to_string())).collect();
        for ev in &input {
            em.emit(&ctx, Arc::clone(ev));
        }
        em.end(&ctx);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), input.len() + 1);
        for (got, want) in seen.iter().zip(&input) {
            assert!(Arc::ptr_eq(got, want));
        }
        assert!(is_end(seen[input.len()].as_ref()));
    }

    #[tokio::test]
    async fn test_noop_swallows_everything() {
        let ctx = CancellationToken::new();
        let (em, o) = pair();
        let (seen, sink) = collector();
        let stage = Map::arc(|_, _, _| {});
        o.register(ctx.clone(), stage.clone());
        stage.register(ctx.clone(), sink);

        for i in 0..100 {
            em.emit(&ctx, Text::arc(i.to_string()));
        }
        em.emit(&ctx, end());

        assert!(seen.lock().unwrap().is_empty());
        assert!(!stage.observable().is_ended());
    }

    #[tokio::test]
    async fn test_noop_filter_has_no_output() {
        let ctx = CancellationToken::new();
        let (em, o) = pair();
        let (seen, sink) = collector();
        o.pipe(ctx.clone(), noop()).register(ctx.clone(), sink);
        for i in 0..10 {
            em.emit(&ctx, Text::arc(i.to_string()));
        }
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transform_may_emit_many() {
        let ctx = CancellationToken::new();
        let (em, o) = pair();
        let (seen, sink) = collector();
        let split = map(|ctx, em, ev| {
            if let Some(t) = ev.downcast_ref::<Text>() {
                for c in t.as_str().chars() {
                    em.emit(ctx, Text::arc(c.to_string()));
                }
            }
        });
        o.pipe(ctx.clone(), split).register(ctx.clone(), sink);

        em.emit(&ctx, Text::arc("xyz"));
        em.emit(&ctx, Text::arc(""));

        let got: Vec<String> = seen
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.downcast_ref::<Text>().unwrap().to_string())
            .collect();
        assert_eq!(got, vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_fwd_propagates_end() {
        let ctx = CancellationToken::new();
        let (em, o) = pair();
        let stage = Map::arc(|ctx, em, ev| em.emit(ctx, Arc::clone(ev)));
        o.register(ctx.clone(), stage.clone());
        em.end(&ctx);
        assert!(stage.observable().is_ended());
    }

    #[test]
    fn test_fresh_instances() {
        let a = fwd();
        let b = fwd();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "map");
    }
}
