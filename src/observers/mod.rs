//! # Observers: the receiving side of a bus.
//!
//! [`Observer`] is the main extension point for users. Every event emitted on
//! a bus flows synchronously into each observer registered on it.
//!
//! ```text
//!   BusEmitter::emit(ctx, ev) ──► [bus lock held] ──► Observer::on_event(ctx, ev)
//!                                        │
//!                    ┌───────────────────┼───────────────────┐
//!                    ▼                   ▼                   ▼
//!               LogWriter           ObserverFn           Filter (Map)
//!               (stdout)          (user closure)      (re-emits downstream)
//! ```
//!
//! #### Note:
//! A simple [`LogWriter`] is available (enabled via the `logging` feature),
//! useful for debug and demos.

#[cfg(feature = "logging")]
mod log;
mod observer;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::{Observer, ObserverFn, ObserverRef};
