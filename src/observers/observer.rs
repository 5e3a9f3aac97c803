//! # Event observer trait.
//!
//! Provides [`Observer`], the receiving end of a bus, and [`ObserverFn`], a
//! closure-backed implementation.
//!
//! ## Rules
//! - `on_event` runs **synchronously** inside the emitting call, while the
//!   emitting bus holds its lock.
//! - Observers are called one after another; a slow observer delays every
//!   other observer of the same bus and the publisher.
//! - An observer must not emit on the bus that is currently delivering to it
//!   (directly or through a filter chain that loops back): that call
//!   deadlocks. Emitting on a *different* bus (a downstream stage) is fine.
//! - The context is the one passed to `emit`; honoring its cancellation is up
//!   to the observer.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::events::EventRef;

/// Shared handle to an observer.
pub type ObserverRef = Arc<dyn Observer>;

/// Event consumer.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tokio_util::sync::CancellationToken;
/// use voyeur::{EventRef, Observer};
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl Observer for Counter {
///     fn on_event(&self, _ctx: &CancellationToken, _event: &EventRef) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
///
///     fn name(&self) -> &'static str { "counter" }
/// }
/// ```
pub trait Observer: Send + Sync + 'static {
    /// Consumes one event.
    fn on_event(&self, ctx: &CancellationToken, event: &EventRef);

    /// Returns the observer name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed observer.
///
/// Calls the wrapped function for each event.
pub struct ObserverFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ObserverFn<F>
where
    F: Fn(&CancellationToken, &EventRef) + Send + Sync + 'static,
{
    /// Creates a new closure-backed observer.
    pub fn new(f: F) -> Self {
        Self { name: "observer_fn", f }
    }

    /// Creates the observer and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use tokio_util::sync::CancellationToken;
    /// use voyeur::{EventRef, Observer, ObserverFn, ObserverRef};
    ///
    /// let o: ObserverRef = ObserverFn::arc(|_ctx: &CancellationToken, ev: &EventRef| {
    ///     println!("{ev:?}");
    /// });
    /// assert_eq!(o.name(), "observer_fn");
    /// ```
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }

    /// Overrides the name reported in logs.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> Observer for ObserverFn<F>
where
    F: Fn(&CancellationToken, &EventRef) + Send + Sync + 'static,
{
    fn on_event(&self, ctx: &CancellationToken, event: &EventRef) {
        (self.f)(ctx, event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> fmt::Debug for ObserverFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverFn").field("name", &self.name).finish()
    }
}
