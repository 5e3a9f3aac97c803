//! # Cancellation watcher.
//!
//! One background task per bus core removes registrations whose context was
//! cancelled. It multiplexes every pending registration instead of spawning a
//! task per observer.
//!
//! ```text
//! register(ctx, o) ──► [unbounded queue] ──► watcher ──► pending: FuturesUnordered<ctx.cancelled()>
//!                                               │
//!                  ctx cancelled ───────────────┼──► core.remove(id)
//!                  done (End emitted) ──────────┼──► exit, registrations stay
//!                  all facets dropped ──────────┴──► exit
//! ```
//!
//! ## Rules
//! - Removal happens after cancellation, with a delay of at least one
//!   scheduler tick. Never synchronously inside `cancel()`.
//! - Once the done signal fires the watcher exits without removing anything.
//! - The watcher holds a `Weak` reference: it never keeps a bus alive.
//! - Without a Tokio runtime the watcher runs on its own thread.
//! - If the runtime hosting the watcher shuts down, the next `register`
//!   starts a new watcher and re-arms every live registration.

use std::sync::Weak;
use std::thread;

use futures::executor;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::shared::Core;
use super::registry::ObserverId;

/// A registration to watch.
pub(crate) struct Watch {
    pub(crate) id: ObserverId,
    pub(crate) ctx: CancellationToken,
}

/// Spawns the watcher for `core` and returns the queue feeding it.
///
/// Runs on the current Tokio runtime if there is one, otherwise on a
/// dedicated thread. If neither can be started the returned queue is closed
/// and the next `register` tries again.
pub(crate) fn spawn(core: Weak<Core>, done: CancellationToken) -> mpsc::UnboundedSender<Watch> {
    let (tx, rx) = mpsc::unbounded_channel();
    let fut = run(core, done, rx);

    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(fut);
        }
        Err(_) => {
            tracing::debug!("no tokio runtime; watching registrations on a dedicated thread");
            let spawned = thread::Builder::new()
                .name("voyeur-watcher".into())
                .spawn(move || executor::block_on(fut));
            if let Err(err) = spawned {
                tracing::warn!(error = %err, "failed to start registration watcher thread");
            }
        }
    }
    tx
}

async fn run(core: Weak<Core>, done: CancellationToken, mut rx: mpsc::UnboundedReceiver<Watch>) {
    let mut pending: FuturesUnordered<BoxFuture<'static, ObserverId>> = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;
            _ = done.cancelled() => break,
            Some(id) = pending.next(), if !pending.is_empty() => {
                match core.upgrade() {
                    Some(core) => core.remove(id),
                    None => break,
                }
            }
            msg = rx.recv() => match msg {
                Some(Watch { id, ctx }) => pending.push(
                    async move {
                        ctx.cancelled().await;
                        id
                    }
                    .boxed(),
                ),
                None => break,
            },
        }
    }
}
