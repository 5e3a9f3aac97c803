//! # Bus: emitter/observable pairs over one shared core.
//!
//! A bus is a registry of observers plus a lock and a one-shot done signal.
//! [`pair`] returns its two facets:
//!
//! ```text
//!  publishers (many)                                   observers
//!   BusEmitter::emit ──┐                          ┌──► Observer::on_event
//!   BusEmitter::emit ──┼──► Core { lock, registry }┼──► Observer::on_event
//!   BusEmitter::end  ──┘        ▲       │          └──► Filter ──► next bus
//!                               │       └── End ──► done signal (once)
//!   BusObservable::register ────┘
//!          │
//!          └──► watcher task: ctx cancelled ──► remove registration
//! ```
//!
//! ## Rules
//! - **Synchronous delivery**: `emit` returns after every observer has run.
//! - **Serialized**: emissions and registry changes on one bus never overlap;
//!   concurrent `emit` calls are ordered by the lock.
//! - **No reentrancy**: an observer emitting on the bus that is delivering to
//!   it deadlocks. Chains of distinct buses are fine.
//! - **Delayed removal**: cancelling a registration's context removes it after
//!   at least one scheduler tick.
//! - **Idempotent end**: only the first `End` fires the done signal.
//! - **Unordered fan-out**: delivery order across observers is unspecified.

mod config;
mod pair;
mod registry;
mod shared;
mod traits;
mod watcher;

pub use config::BusConfig;
pub use pair::{pair, pair_with, BusEmitter, BusObservable};
pub use registry::ObserverId;
pub use traits::{Emitter, Observable, ObservableRef};
