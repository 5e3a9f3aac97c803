//! # Filters: pipeline stages between buses.
//!
//! ```text
//!   bus A ──► Filter ──► bus B (inside the filter) ──► observers / next filter
//! ```
//!
//! ## Contents
//! - [`Filter`], [`FilterRef`], [`new_filter`] the composition capability
//! - [`Map`], [`map`], [`noop`], [`fwd`] transform-driven filters
//! - [`len_eq`], [`prefix`], [`concat`] ready-made text filters
//! - [`FilterBuilder`], [`Param`], [`ParamKind`] runtime-checked constructors
//! - [`Catalog`], [`StageSpec`], [`Pipeline`] config-driven assembly
//!
//! `noop` and `fwd` are identities for composition: `fwd` after any observable
//! reproduces its events, `noop` produces nothing.

mod builder;
mod builtin;
mod catalog;
mod filter;
mod map;

pub use builder::{FilterBuilder, FilterCtor, Param, ParamKind};
pub use builtin::{concat, len_eq, prefix};
pub use catalog::{Catalog, Pipeline, StageSpec};
pub use filter::{new_filter, Filter, FilterRef};
pub use map::{fwd, map, noop, Map, Transform};
