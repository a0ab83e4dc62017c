//! Retry observation and logging

use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Receives callbacks while a retry loop runs
pub trait RetryObserver: Send + Sync {
    /// An attempt is about to start (1-indexed)
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// An attempt failed and another one will follow after `delay`
    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration);

    /// The operation succeeded
    fn on_success(&self, attempt: u32, total_duration: Duration);

    /// The final attempt failed
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display);

    /// The predicate refused to retry
    fn on_rejected(&self, attempt: u32, error: &dyn Display) {
        let _ = (attempt, error);
    }
}

/// Observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Display, _delay: Duration) {}

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Display) {}
}

/// Observer that logs retry events through `tracing`
///
/// Exhaustion is logged at WARN rather than ERROR: callers of the SDK treat a
/// failed artifact as a per-item warning.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        debug!(
            operation = %self.operation,
            attempt,
            max_attempts,
            "Starting attempt"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration) {
        warn!(
            operation = %self.operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Attempt failed, retrying: {}",
            error
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            info!(
                operation = %self.operation,
                attempt,
                duration_ms = total_duration.as_millis() as u64,
                "Succeeded after retry"
            );
        } else {
            debug!(operation = %self.operation, "Succeeded on first attempt");
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        warn!(
            operation = %self.operation,
            attempts,
            "All attempts failed: {}",
            final_error
        );
    }

    fn on_rejected(&self, attempt: u32, error: &dyn Display) {
        debug!(
            operation = %self.operation,
            attempt,
            "Error is not retryable: {}",
            error
        );
    }
}
