//! # LogWriter: simple event printer
//!
//! A minimal observer that prints incoming events to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! test
//! foo
//! [temperature] Temperature(21.5)
//! End
//! ```

use tokio_util::sync::CancellationToken;

use crate::events::{is_end, EventRef, Text};
use crate::observers::Observer;

/// Event writer observer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn render(e: &EventRef) -> String {
        if is_end(e.as_ref()) {
            return "End".to_string();
        }
        match e.downcast_ref::<Text>() {
            Some(text) => text.to_string(),
            None => format!("[{}] {:?}", e.event_type(), e),
        }
    }
}

impl Observer for LogWriter {
    fn on_event(&self, _ctx: &CancellationToken, e: &EventRef) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
