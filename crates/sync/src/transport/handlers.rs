//! Per-tag handler registry.
//!
//! Dispatch is single-subscriber: exactly one handler per event tag, and
//! registering a tag again replaces the previous handler. Consumers that
//! want fan-out compose it themselves above this layer.

use std::collections::HashMap;

use haven_protocol::Envelope;

/// Handler invoked with every envelope arriving under its tag.
///
/// Runs synchronously on the read task; it must not block.
pub type EventHandler = Box<dyn Fn(Envelope) + Send + Sync + 'static>;

/// Mapping from event-type tag to its single active handler.
#[derive(Default)]
pub struct HandlerMap {
    handlers: HashMap<String, EventHandler>,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a tag, replacing any previous one
    /// (last-registered-wins).
    pub fn on(mut self, tag: impl Into<String>, handler: impl Fn(Envelope) + Send + Sync + 'static) -> Self {
        self.handlers.insert(tag.into(), Box::new(handler));
        self
    }

    /// The handler currently registered for `tag`, if any.
    pub fn get(&self, tag: &str) -> Option<&EventHandler> {
        self.handlers.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("HandlerMap").field("tags", &tags).finish()
    }
}
