//! The event-stream transport: one live connection, typed dispatch,
//! self-healing across drops.

mod client;
mod handlers;

pub use client::EventStreamClient;
pub use handlers::{EventHandler, HandlerMap};

use std::time::Duration;

/// Fixed delay between a close (for any reason) and the next connect
/// attempt. There is no backoff growth and no retry cap; the client
/// reconnects forever until shut down.
pub const RETRY_DELAY: Duration = Duration::from_secs(3);
