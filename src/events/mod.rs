//! Events: the data model moved by every bus.
//!
//! ## Contents
//! - [`Event`], [`EventRef`] the event capability and its shared handle
//! - [`End`], [`end`], [`is_end`] the terminal sentinel
//! - [`Text`] a plain text payload

mod event;

pub use event::{end, is_end, AsAny, End, Event, EventRef, Text};
