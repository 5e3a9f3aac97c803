//! # Emitter/observable facets of one bus core.
//!
//! [`pair`] creates a fresh core and returns its two facets. Events emitted on
//! the [`BusEmitter`] are observed by everything registered on the
//! [`BusObservable`]. Both are cheap to clone; the core lives as long as the
//! longest-lived clone of either facet.
//!
//! ## Example
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use std::sync::{Arc, Mutex};
//! use tokio_util::sync::CancellationToken;
//! use voyeur::{pair, Emitter, EventRef, Observable, ObserverFn, Text};
//!
//! let ctx = CancellationToken::new();
//! let (em, o) = pair();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! o.register(ctx.clone(), ObserverFn::arc(move |_: &CancellationToken, ev: &EventRef| {
//!     sink.lock().unwrap().push(ev.event_type().to_string());
//! }));
//!
//! em.emit(&ctx, Text::arc("test"));
//! em.end(&ctx);
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["string", "End"]);
//! assert!(o.is_ended());
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::config::BusConfig;
use super::registry::ObserverId;
use super::shared::Core;
use super::traits::{Emitter, Observable};
use crate::events::EventRef;
use crate::observers::ObserverRef;

/// Creates a bus with the default [`BusConfig`].
pub fn pair() -> (BusEmitter, BusObservable) {
    pair_with(BusConfig::default())
}

/// Creates a bus with the given config.
pub fn pair_with(cfg: BusConfig) -> (BusEmitter, BusObservable) {
    let core = Core::new(cfg);
    (
        BusEmitter {
            core: Arc::clone(&core),
        },
        BusObservable { core },
    )
}

/// Publishing facet of a bus.
#[derive(Clone)]
pub struct BusEmitter {
    core: Arc<Core>,
}

impl BusEmitter {
    /// Returns the label from [`BusConfig`].
    pub fn label(&self) -> &str {
        self.core.label()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// True if no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once `End` has been emitted.
    pub fn is_ended(&self) -> bool {
        self.core.is_ended()
    }
}

impl Emitter for BusEmitter {
    fn emit(&self, ctx: &CancellationToken, event: EventRef) {
        self.core.emit(ctx, event);
    }
}

impl fmt::Debug for BusEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusEmitter")
            .field("label", &self.label())
            .finish()
    }
}

/// Subscribing facet of a bus.
#[derive(Clone)]
pub struct BusObservable {
    core: Arc<Core>,
}

impl BusObservable {
    /// Returns the label from [`BusConfig`].
    pub fn label(&self) -> &str {
        self.core.label()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    /// True if no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while the registration `id` is still present.
    pub fn is_registered(&self, id: ObserverId) -> bool {
        self.core.contains(id)
    }

    /// True once `End` has been emitted.
    pub fn is_ended(&self) -> bool {
        self.core.is_ended()
    }

    /// Waits until `End` has been emitted on this bus.
    pub async fn ended(&self) {
        self.core.wait_ended().await;
    }
}

impl Observable for BusObservable {
    fn register(&self, ctx: CancellationToken, observer: ObserverRef) -> ObserverId {
        self.core.register(ctx, observer)
    }
}

impl fmt::Debug for BusObservable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusObservable")
            .field("label", &self.label())
            .finish()
    }
}
