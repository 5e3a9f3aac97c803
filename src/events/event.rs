//! # Events carried by the bus.
//!
//! An [`Event`] is an immutable value with a short type discriminator
//! ([`Event::event_type`]). Concrete payloads are ordinary Rust types; the bus
//! moves them around as [`EventRef`] (`Arc<dyn Event>`), so fan-out and
//! re-emission never copy the payload.
//!
//! The terminal [`End`] event closes a bus. It is recognised by **type**, not by
//! its discriminator string, so a user event that happens to report `"End"` is
//! never mistaken for stream termination.
//!
//! ## Example
//! ```rust
//! use voyeur::{end, is_end, Event, EventRef, Text};
//!
//! let ev: EventRef = Text::arc("hello");
//! assert_eq!(ev.event_type(), "string");
//! assert_eq!(ev.downcast_ref::<Text>().map(Text::as_str), Some("hello"));
//! assert!(!is_end(ev.as_ref()));
//!
//! assert!(is_end(end().as_ref()));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Shared handle to an event.
pub type EventRef = Arc<dyn Event>;

/// Access to the concrete type behind a `dyn Event`.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// # Immutable event value.
///
/// Implementors only provide the type discriminator; the payload is whatever
/// fields the concrete type carries.
///
/// # Example
/// ```
/// use voyeur::Event;
///
/// #[derive(Debug)]
/// struct Temperature(f32);
///
/// impl Event for Temperature {
///     fn event_type(&self) -> &str { "temperature" }
/// }
///
/// assert_eq!(Temperature(21.5).event_type(), "temperature");
/// ```
pub trait Event: AsAny + fmt::Debug + Send + Sync + 'static {
    /// Returns a short descriptor for the event.
    fn event_type(&self) -> &str;
}

impl dyn Event {
    /// Returns the concrete payload if this event is a `T`.
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// True if this event is a `T`.
    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Terminal event. Like EOF or a channel close: nothing to see here anymore.
///
/// Emitting it fires the bus's done signal (once).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct End;

impl Event for End {
    fn event_type(&self) -> &str {
        "End"
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("End")
    }
}

/// Returns the shared [`End`] event.
///
/// Every call hands out the same allocation, so `Arc::ptr_eq` holds between
/// any two results; [`is_end`] is the check to use, though.
pub fn end() -> EventRef {
    static END: OnceLock<EventRef> = OnceLock::new();
    Arc::clone(END.get_or_init(|| Arc::new(End)))
}

/// True if `event` is the terminal [`End`] event.
#[inline]
pub fn is_end(event: &dyn Event) -> bool {
    event.is::<End>()
}

/// Plain text event with discriminator `"string"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text(pub String);

impl Text {
    /// Creates a text event.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a text event and returns it as an [`EventRef`].
    pub fn arc(text: impl Into<String>) -> EventRef {
        Arc::new(Self::new(text))
    }

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Event for Text {
    fn event_type(&self) -> &str {
        "string"
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FakeEnd;

    impl Event for FakeEnd {
        fn event_type(&self) -> &str {
            "End"
        }
    }

    #[test]
    fn test_end_is_shared() {
        let a = end();
        let b = end();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.event_type(), "End");
    }

    #[test]
    fn test_end_detected_by_type_not_name() {
        assert!(is_end(&End));
        assert!(is_end(end().as_ref()));
        assert!(!is_end(&FakeEnd));
        assert!(!is_end(&Text::new("End")));
    }

    #[test]
    fn test_text_downcast() {
        let ev = Text::arc("abc");
        assert_eq!(ev.event_type(), "string");
        assert!(ev.is::<Text>());
        assert_eq!(ev.downcast_ref::<Text>(), Some(&Text::new("abc")));
        assert!(ev.downcast_ref::<End>().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Text::new("foo").to_string(), "foo");
        assert_eq!(End.to_string(), "End");
    }
}
