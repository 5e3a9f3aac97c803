//! # Publish and subscribe capabilities.
//!
//! [`Emitter`] and [`Observable`] are the two halves of a bus. The built-in
//! implementations are [`BusEmitter`](super::BusEmitter) and
//! [`BusObservable`](super::BusObservable), created together by
//! [`pair`](super::pair); filters implement [`Observable`] too.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::registry::ObserverId;
use crate::events::{end, EventRef};
use crate::filters::FilterRef;
use crate::observers::ObserverRef;

/// Shared handle to an observable.
pub type ObservableRef = Arc<dyn Observable>;

/// Accepts observer registrations.
pub trait Observable: Send + Sync + 'static {
    /// Registers `observer` until `ctx` is cancelled.
    ///
    /// The observer receives every event emitted after this call returns.
    /// Cancelling `ctx` removes this registration (and only this one) shortly
    /// afterwards; removal is not synchronous with `cancel()`.
    ///
    /// The returned id identifies the registration; it can be ignored.
    ///
    /// Works with or without a Tokio runtime; removal is driven by a
    /// background watcher either way.
    fn register(&self, ctx: CancellationToken, observer: ObserverRef) -> ObserverId;

    /// Registers `filter` as an observer and returns it, so stages chain:
    ///
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use tokio_util::sync::CancellationToken;
    /// use voyeur::{fwd, noop, pair, Observable};
    ///
    /// let ctx = CancellationToken::new();
    /// let (_em, o) = pair();
    /// let tail = o.pipe(ctx.clone(), fwd()).pipe(ctx.clone(), noop());
    /// # let _ = tail;
    /// # }
    /// ```
    fn pipe(&self, ctx: CancellationToken, filter: FilterRef) -> FilterRef {
        self.register(ctx, Arc::clone(&filter).into_observer());
        filter
    }
}

/// Publishes events.
///
/// Delivery is synchronous: when `emit` returns, every observer registered
/// before the call has seen the event exactly once.
pub trait Emitter: Send + Sync + 'static {
    /// Delivers `event` to every registered observer.
    ///
    /// `ctx` is passed through to observers; the bus itself ignores it.
    fn emit(&self, ctx: &CancellationToken, event: EventRef);

    /// Emits the terminal [`End`](crate::End) event.
    fn end(&self, ctx: &CancellationToken) {
        self.emit(ctx, end());
    }
}
