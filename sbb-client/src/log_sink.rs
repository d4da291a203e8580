//! Log sink the client writes progress and fault lines to

use sbb_core::Verbosity;

/// Destination for human-readable client log lines
///
/// Injected at construction so the client does not depend on a process-wide
/// logger configuration.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink: Send + Sync {
    /// Connection and transaction progress
    fn progress(&self, message: &str);

    /// Timeouts and other connection losses
    fn fault(&self, message: &str);
}

/// [`LogSink`] forwarding to the `log` facade
///
/// Progress goes out at `Info` when verbose and `Debug` otherwise; faults
/// always go out at `Error`.
#[derive(Debug, Clone, Copy)]
pub struct LevelSink {
    level: log::Level,
}

impl LevelSink {
    pub fn new(verbosity: Verbosity) -> Self {
        let level = match verbosity {
            Verbosity::Verbose => log::Level::Info,
            Verbosity::Quiet => log::Level::Debug,
        };
        Self { level }
    }

    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl LogSink for LevelSink {
    fn progress(&self, message: &str) {
        log::log!(self.level, "{}", message);
    }

    fn fault(&self, message: &str) {
        log::error!("{}", message);
    }
}
