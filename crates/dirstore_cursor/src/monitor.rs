//! Open/closed lifecycle tracking for cursors and tables.

use crate::error::{CursorError, CursorResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default cause recorded when a resource is closed without one.
const DEFAULT_CAUSE: &str = "resource has been closed";

/// Tracks the open/closed state of a resource and the cause of its closure.
///
/// Every cursor and table delegates lifecycle checks to one monitor. The
/// open→closed transition is one-way and idempotent: only the first `close`
/// call records a cause, later calls are no-ops.
///
/// # Visibility
///
/// Synchronization is deliberately relaxed. `is_closed` is a relaxed atomic
/// load, so a close issued on one thread may be observed late by another.
/// The monitor is an advisory fast-fail on the hot traversal path, not a
/// correctness-critical lock; tightening it to acquire/release or a full
/// lock would tax every `next()` call for no contract-level gain.
#[derive(Debug, Default)]
pub struct ClosureMonitor {
    closed: AtomicBool,
    cause: Mutex<Option<String>>,
}

impl ClosureMonitor {
    /// Creates a monitor in the open state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the resource with the default cause.
    ///
    /// Idempotent: if the resource is already closed this is a no-op and
    /// the original cause is kept.
    pub fn close(&self) {
        self.close_with_message(DEFAULT_CAUSE);
    }

    /// Closes the resource, recording `message` as the cause.
    pub fn close_with_message(&self, message: &str) {
        // First close wins; later calls must not overwrite the cause.
        if self
            .closed
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            *self.cause.lock() = Some(message.to_owned());
        }
    }

    /// Closes the resource, recording the rendered error as the cause.
    pub fn close_with_cause(&self, cause: &dyn std::error::Error) {
        self.close_with_message(&cause.to_string());
    }

    /// Returns true once the resource has been closed.
    ///
    /// Non-blocking relaxed read; see the type-level visibility note.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Fails with the stored cause if the resource is closed.
    ///
    /// `operation` names the guarded call for diagnostics.
    pub fn check_not_closed(&self, operation: &str) -> CursorResult<()> {
        if !self.is_closed() {
            return Ok(());
        }
        let cause = self
            .cause
            .lock()
            .clone()
            .unwrap_or_else(|| DEFAULT_CAUSE.to_owned());
        Err(CursorError::Closed {
            cause: format!("{operation}: {cause}"),
        })
    }

    /// Returns the recorded close cause, if the resource is closed.
    #[must_use]
    pub fn cause(&self) -> Option<String> {
        self.cause.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_starts_open() {
        let monitor = ClosureMonitor::new();
        assert!(!monitor.is_closed());
        assert!(monitor.check_not_closed("get").is_ok());
        assert!(monitor.cause().is_none());
    }

    #[test]
    fn monitor_close_records_default_cause() {
        let monitor = ClosureMonitor::new();
        monitor.close();
        assert!(monitor.is_closed());
        assert_eq!(monitor.cause().unwrap(), DEFAULT_CAUSE);
    }

    #[test]
    fn monitor_close_is_idempotent() {
        let monitor = ClosureMonitor::new();
        monitor.close_with_message("first");
        monitor.close_with_message("second");
        monitor.close();
        assert_eq!(monitor.cause().unwrap(), "first");
    }

    #[test]
    fn monitor_check_reports_cause() {
        let monitor = ClosureMonitor::new();
        monitor.close_with_message("partition shut down");
        let err = monitor.check_not_closed("next").unwrap_err();
        match err {
            CursorError::Closed { cause } => {
                assert!(cause.contains("next"));
                assert!(cause.contains("partition shut down"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn monitor_close_with_error_cause() {
        let monitor = ClosureMonitor::new();
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe gone");
        monitor.close_with_cause(&io);
        assert!(monitor.cause().unwrap().contains("pipe gone"));
    }
}
