//! Informational and error event streams.
//!
//! Handlers are plain callbacks stored in registration order and invoked
//! synchronously at the point of emission. Nothing is buffered: a handler
//! registered after an event was emitted never sees it. Every event is also
//! logged through `tracing`.

use tracing::{error, info};

/// Callback receiving one event message.
pub type EventHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Registered handlers for the two event streams.
#[derive(Default)]
pub struct EventSink {
    info_handlers: Vec<EventHandler>,
    error_handlers: Vec<EventHandler>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for progress messages.
    pub fn on_info(&mut self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.info_handlers.push(Box::new(handler));
    }

    /// Register a handler for error messages.
    pub fn on_error(&mut self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.error_handlers.push(Box::new(handler));
    }

    pub fn info(&self, message: &str) {
        info!("{message}");
        for handler in &self.info_handlers {
            handler(message);
        }
    }

    pub fn error(&self, message: &str) {
        error!("{message}");
        for handler in &self.error_handlers {
            handler(message);
        }
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("info_handlers", &self.info_handlers.len())
            .field("error_handlers", &self.error_handlers.len())
            .finish()
    }
}
