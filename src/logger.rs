//! Diagnostic sink injected into the client.
//!
//! The client reports every failure through a [`ClientLogger`] and returns
//! only a boolean to the caller. Loggers are passed explicitly at
//! configuration time; there is no global logger state in this crate beyond
//! what the `log` facade already provides.

use log::warn;

/// Log target used by [`DefaultLogger`].
pub const LOG_TARGET: &str = "thingsboard";

/// Single-method sink for client diagnostics.
pub trait ClientLogger: Send + Sync {
    /// Record one diagnostic message.
    fn log(&self, message: &str);
}

/// Forwards messages to the `log` facade at `warn` level.
///
/// Messages are dropped unless the application installs a `log` backend,
/// which makes this a no-op by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultLogger;

impl ClientLogger for DefaultLogger {
    fn log(&self, message: &str) {
        warn!(target: LOG_TARGET, "[TB] {message}");
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl ClientLogger for NullLogger {
    fn log(&self, _message: &str) {}
}

impl<F> ClientLogger for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Shared instance used when no logger was configured.
pub(crate) static DEFAULT_LOGGER: DefaultLogger = DefaultLogger;

/// Installs the `logtest` capture logger once per test process; the `log`
/// facade rejects a second `set_logger`, so every test shares this one.
/// Events captured before the call are discarded so capture starts fresh.
#[cfg(test)]
pub(crate) fn start_test_logger() -> logtest::Logger {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| drop(logtest::Logger::start()));
    let mut logger = logtest::Logger;
    while logger.pop().is_some() {}
    logger
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use rstest::rstest;
    use serial_test::serial;

    use super::*;

    #[rstest]
    #[serial]
    fn default_logger_forwards_to_log_facade() {
        let mut logger = start_test_logger();
        DefaultLogger.log("default logger probe");

        // Other tests may log concurrently; look for our record only.
        let record = std::iter::from_fn(|| logger.pop())
            .find(|r| r.args() == "[TB] default logger probe")
            .expect("no log produced");
        assert_eq!(record.level(), log::Level::Warn);
        assert_eq!(record.target(), LOG_TARGET);
    }

    #[rstest]
    fn closures_are_loggers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |message: &str| seen.lock().push(message.to_owned())
        };
        sink.log("first");
        sink.log("second");
        assert_eq!(*seen.lock(), vec!["first".to_owned(), "second".to_owned()]);
    }

    #[rstest]
    fn null_logger_accepts_messages() {
        NullLogger.log("ignored");
    }
}
