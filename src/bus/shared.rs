//! # Bus core: registry, lock and done signal.
//!
//! [`Core`] is the shared state behind a [`BusEmitter`](super::BusEmitter) /
//! [`BusObservable`](super::BusObservable) pair. Both facets hold an `Arc` to
//! the same core; it is dropped when the last facet goes away.
//!
//! ## Rules
//! - One `std::sync::Mutex` serializes registry mutation **and** emission.
//! - Emission holds the lock while every observer runs, so an observer must not
//!   emit on the same core (deadlock).
//! - The done signal is cancelled at most once, the first time `End` is
//!   emitted; later `End`s are delivered but leave the signal alone.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::config::BusConfig;
use super::registry::{ObserverId, Registry};
use super::watcher::{self, Watch};
use crate::events::{is_end, EventRef};
use crate::observers::ObserverRef;

/// Mutable state guarded by the core lock.
#[derive(Default)]
struct State {
    registry: Registry,
    ended: bool,
    watcher: Option<mpsc::UnboundedSender<Watch>>,
}

/// Shared state of one bus.
pub(crate) struct Core {
    label: Cow<'static, str>,
    state: Mutex<State>,
    done: CancellationToken,
}

impl Core {
    pub(crate) fn new(cfg: BusConfig) -> Arc<Self> {
        Arc::new(Self {
            label: cfg.label,
            state: Mutex::new(State::default()),
            done: CancellationToken::new(),
        })
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// Acquires the core lock.
    ///
    /// A panic inside an observer poisons the lock; the registry itself is
    /// never left half-updated, so the guard is recovered.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!(
                bus = %self.label,
                "bus lock poisoned by a panicking observer; recovering"
            );
            poisoned.into_inner()
        })
    }

    /// Adds `observer` and hands its context to the watcher.
    ///
    /// The registry update is synchronous; the next `emit` sees the observer.
    /// The watcher is in place before the observer is inserted.
    pub(crate) fn register(
        self: &Arc<Self>,
        ctx: CancellationToken,
        observer: ObserverRef,
    ) -> ObserverId {
        let id = ObserverId::next();
        let name = observer.name();

        let watch_tx = {
            let mut st = self.lock();
            let tx = if st.ended {
                None
            } else {
                Some(self.watcher_tx(&mut st))
            };
            st.registry.insert(id, observer, ctx.clone());
            tx
        };

        tracing::debug!(bus = %self.label, observer = name, id = %id, "observer registered");

        if let Some(tx) = watch_tx {
            // A dead watcher is replaced on the next register, which re-sends
            // every live registration, this one included.
            let _ = tx.send(Watch { id, ctx });
        }
        id
    }

    /// Returns the watcher queue, starting a watcher if none is running.
    ///
    /// A fresh watcher gets every registration already in the registry, so
    /// registrations watched by a watcher whose runtime shut down are not lost.
    fn watcher_tx(self: &Arc<Self>, st: &mut State) -> mpsc::UnboundedSender<Watch> {
        if let Some(tx) = st.watcher.as_ref().filter(|tx| !tx.is_closed()) {
            return tx.clone();
        }
        let tx = watcher::spawn(Arc::downgrade(self), self.done.clone());
        let mut rearmed = 0usize;
        for (id, ctx) in st.registry.scopes() {
            let _ = tx.send(Watch {
                id,
                ctx: ctx.clone(),
            });
            rearmed += 1;
        }
        if rearmed > 0 {
            tracing::debug!(bus = %self.label, rearmed, "registration watcher restarted");
        }
        st.watcher = Some(tx.clone());
        tx
    }

    /// Removes one registration. Called by the watcher after cancellation.
    pub(crate) fn remove(&self, id: ObserverId) {
        let removed = self.lock().registry.remove(id);
        if let Some(observer) = removed {
            tracing::debug!(
                bus = %self.label,
                observer = observer.name(),
                id = %id,
                "observer removed after cancellation"
            );
        }
    }

    /// Delivers `event` to every registered observer, then fires the done
    /// signal if it is the first `End`.
    pub(crate) fn emit(&self, ctx: &CancellationToken, event: EventRef) {
        let mut st = self.lock();

        tracing::trace!(
            bus = %self.label,
            event_type = event.event_type(),
            observers = st.registry.len(),
            "emit"
        );

        for observer in st.registry.observers() {
            observer.on_event(ctx, &event);
        }

        if is_end(event.as_ref()) {
            if st.ended {
                tracing::warn!(
                    bus = %self.label,
                    "End emitted on an ended bus; done signal already fired"
                );
            } else {
                st.ended = true;
                st.watcher = None;
                self.done.cancel();
                tracing::debug!(bus = %self.label, observers = st.registry.len(), "bus ended");
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().registry.len()
    }

    pub(crate) fn contains(&self, id: ObserverId) -> bool {
        self.lock().registry.contains(id)
    }

    pub(crate) fn is_ended(&self) -> bool {
        self.lock().ended
    }

    pub(crate) async fn wait_ended(&self) {
        self.done.cancelled().await
    }
}
