//! # Print Observer Example
//!
//! Registers the built-in `LogWriter`, emits a few events, cancels the
//! registration and ends the bus.
//!
//! Expected output:
//! ```text
//! test
//! foo
//! End
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example print_observer --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use voyeur::{pair, Emitter, LogWriter, Observable, Text};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A context we can cancel.
    let ctx = CancellationToken::new();
    let (em, o) = pair();

    let printer = Arc::new(LogWriter::new());
    o.register(ctx.clone(), printer.clone());

    em.emit(&ctx, Text::arc("test"));
    em.emit(&ctx, Text::arc("foo"));

    // Only affects registrations made with `ctx` (or its children).
    ctx.cancel();
    // Removal happens on the bus watcher; give it a tick.
    while !o.is_empty() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // Not seen: the printer is gone.
    em.emit(&ctx, Text::arc("bar"));

    // Register again, this time without a way to cancel.
    let forever = CancellationToken::new();
    o.register(forever.clone(), printer);

    em.end(&forever);
}
