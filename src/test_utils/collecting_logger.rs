//! A logger that accumulates messages in memory for test assertions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::logger::ClientLogger;

/// Logger that stores every message it receives for later inspection.
#[derive(Clone, Debug, Default)]
pub struct CollectingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingLogger {
    /// Create a new empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of all messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// True if any message contains `fragment`.
    pub fn contains(&self, fragment: &str) -> bool {
        self.messages.lock().iter().any(|m| m.contains(fragment))
    }
}

impl ClientLogger for CollectingLogger {
    fn log(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}
