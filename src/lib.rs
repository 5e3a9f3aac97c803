//! # voyeur
//!
//! **voyeur** helps you build applications using the
//! [Observer pattern](https://en.wikipedia.org/wiki/Observer_pattern).
//!
//! It provides an in-process event bus made of an emitter (publish side) and
//! an observable (subscribe side), registrations whose lifetime is tied to a
//! [`CancellationToken`](tokio_util::sync::CancellationToken), and composable
//! filters that transform, drop or aggregate events before re-publishing them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   publisher                         bus core                          subscribers
//! ┌────────────┐  emit(ctx, ev)   ┌───────────────────────┐  on_event  ┌──────────────┐
//! │ BusEmitter │ ───────────────► │ lock                  │ ─────────► │ Observer     │
//! └────────────┘                  │ registry: id → obs    │ ─────────► │ Observer     │
//!                                 │ done (fires on End)   │ ─────────► │ Filter (Map) │
//! ┌──────────────┐ register(ctx,o)└───────────┬───────────┘            └──────┬───────┘
//! │BusObservable │ ──────────────────────────►│                               │ emit
//! └──────────────┘                            │                               ▼
//!                                   watcher task: ctx cancelled        bus core of the
//!                                   ──► remove registration            filter ──► ...
//! ```
//!
//! ### Lifecycle of a registration
//! ```text
//! register(ctx, observer)
//!   ├─► insert into registry (visible to the next emit)
//!   └─► hand ctx to the bus watcher
//!
//! watcher:
//!   ├─ ctx cancelled ─► remove exactly this registration (after >= 1 tick)
//!   ├─ End emitted   ─► stop watching, registrations stay
//!   └─ bus dropped   ─► stop
//! ```
//!
//! ## Rules
//! - Delivery is synchronous and serialized per bus: `emit` returns after every
//!   observer ran, and two `emit`s on one bus never overlap.
//! - Do not emit on a bus from inside one of its own observers (deadlock).
//! - The first `End` fires the done signal; later ones are delivered only.
//! - Delivery order across observers of one bus is unspecified.
//!
//! ## Features
//! | Area            | Description                                            | Key types / traits                          |
//! |-----------------|--------------------------------------------------------|---------------------------------------------|
//! | **Events**      | Typed payloads with a discriminator and a terminal End | [`Event`], [`EventRef`], [`End`], [`Text`]  |
//! | **Bus**         | Emitter/observable pairs over one shared core          | [`pair`], [`BusEmitter`], [`BusObservable`] |
//! | **Observers**   | Receive events with the emitting context               | [`Observer`], [`ObserverFn`]                |
//! | **Filters**     | Pipeline stages, transform-driven                      | [`Filter`], [`map`], [`noop`], [`fwd`]      |
//! | **Assembly**    | Runtime-checked builders and config-driven pipelines   | [`FilterBuilder`], [`Catalog`]              |
//! | **Errors**      | Typed builder errors                                   | [`BuildError`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tokio_util::sync::CancellationToken;
//! use voyeur::{concat, pair, Emitter, EventRef, Observable, ObserverFn, Text};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let ctx = CancellationToken::new();
//!     let (em, o) = pair();
//!
//!     let seen = Arc::new(Mutex::new(Vec::new()));
//!     let sink = Arc::clone(&seen);
//!     o.pipe(ctx.clone(), concat()).register(
//!         ctx.clone(),
//!         ObserverFn::arc(move |_: &CancellationToken, ev: &EventRef| {
//!             if let Some(t) = ev.downcast_ref::<Text>() {
//!                 sink.lock().unwrap().push(t.to_string());
//!             }
//!         }),
//!     );
//!
//!     for s in ["a", "b", "c"] {
//!         em.emit(&ctx, Text::arc(s));
//!     }
//!     em.end(&ctx);
//!
//!     assert_eq!(*seen.lock().unwrap(), vec!["a", "ab", "abc"]);
//! }
//! ```
mod bus;
mod error;
mod events;
mod filters;
mod observers;

// ---- Public re-exports ----

pub use bus::{
    pair, pair_with, BusConfig, BusEmitter, BusObservable, Emitter, Observable, ObservableRef,
    ObserverId,
};
pub use error::BuildError;
pub use events::{end, is_end, AsAny, End, Event, EventRef, Text};
pub use filters::{
    concat, fwd, len_eq, map, new_filter, noop, prefix, Catalog, Filter, FilterBuilder,
    FilterCtor, FilterRef, Map, Param, ParamKind, Pipeline, StageSpec, Transform,
};
pub use observers::{Observer, ObserverFn, ObserverRef};

// Optional: expose a simple built-in stdout observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
