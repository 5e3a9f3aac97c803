//! # Filter: observer and observable at once.
//!
//! A [`Filter`] consumes events (as an [`Observer`]) and lets others register
//! for what it publishes (as an [`Observable`]). It is the unit of pipeline
//! composition: register a filter on a bus, register the next stage on the
//! filter, and so on.
//!
//! Every type implementing both capabilities is a filter; [`new_filter`]
//! glues an arbitrary observable/observer pair together.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::bus::{Observable, ObservableRef, ObserverId};
use crate::events::EventRef;
use crate::observers::{Observer, ObserverRef};

/// Shared handle to a filter.
pub type FilterRef = Arc<dyn Filter>;

/// Both observer and observable. A generalization of map, filter and reduce.
///
/// Implemented for every `Observable + Observer` type.
pub trait Filter: Observable + Observer {
    /// Views this filter as its observer half.
    fn into_observer(self: Arc<Self>) -> ObserverRef;

    /// Views this filter as its observable half.
    fn into_observable(self: Arc<Self>) -> ObservableRef;
}

impl<T: Observable + Observer> Filter for T {
    fn into_observer(self: Arc<Self>) -> ObserverRef {
        self
    }

    fn into_observable(self: Arc<Self>) -> ObservableRef {
        self
    }
}

/// Filter made of an independent observable and observer.
struct Composed {
    observable: ObservableRef,
    observer: ObserverRef,
}

impl Observable for Composed {
    fn register(&self, ctx: CancellationToken, observer: ObserverRef) -> ObserverId {
        self.observable.register(ctx, observer)
    }
}

impl Observer for Composed {
    fn on_event(&self, ctx: &CancellationToken, event: &EventRef) {
        self.observer.on_event(ctx, event);
    }

    fn name(&self) -> &'static str {
        self.observer.name()
    }
}

/// Constructs a filter from an observable and an observer.
///
/// Registrations go to `observable`, events go to `observer`; no new bus is
/// created.
pub fn new_filter(observable: ObservableRef, observer: ObserverRef) -> FilterRef {
    Arc::new(Composed {
        observable,
        observer,
    })
}
