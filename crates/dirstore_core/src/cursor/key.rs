//! Cursor over a browser's sorted key/value pairs.

use crate::browser::Browser;
use crate::tuple::Tuple;
use dirstore_cursor::{ClosureMonitor, Cursor, CursorError, CursorResult};

/// A cursor over an underlying sorted-storage browser.
///
/// This cursor performs no duplicate handling; each browser step is one
/// key/value pair. One `Tuple` buffer is reused across advances, so a
/// caller that wants to retain a pair copies it with `get_owned` before
/// stepping again.
///
/// # Consistency invariant
///
/// The `available` flag is set from the result of every step. It must
/// never diverge from the buffer state: if the flag says a pair is
/// available but the buffer was never filled, `get` fails with an
/// inconsistent-state error rather than returning stale data.
pub struct BrowserCursor<K, V> {
    browser: Box<dyn Browser<K, V>>,
    buffer: Option<Tuple<K, V>>,
    available: bool,
    monitor: ClosureMonitor,
}

impl<K, V> BrowserCursor<K, V> {
    /// Creates a cursor over `browser`, parked before the first pair.
    #[must_use]
    pub fn new(browser: Box<dyn Browser<K, V>>) -> Self {
        Self {
            browser,
            buffer: None,
            available: false,
            monitor: ClosureMonitor::new(),
        }
    }

    /// Parks the cursor so the next `next()` lands on the first pair whose
    /// key is not less than `key`.
    ///
    /// # Errors
    ///
    /// Fails with `Unsupported` when the browser cannot seek.
    pub fn before_key(&mut self, key: &K) -> CursorResult<()> {
        self.monitor.check_not_closed("before_key")?;
        self.browser.before_key(key)?;
        self.available = false;
        Ok(())
    }

    /// Parks the cursor so the next `next()` lands on the first pair whose
    /// key is greater than `key`.
    ///
    /// # Errors
    ///
    /// Fails with `Unsupported` when the browser cannot seek.
    pub fn after_key(&mut self, key: &K) -> CursorResult<()> {
        self.monitor.check_not_closed("after_key")?;
        self.browser.after_key(key)?;
        self.available = false;
        Ok(())
    }
}

impl<K, V> Cursor for BrowserCursor<K, V> {
    type Item = Tuple<K, V>;

    fn before(&mut self, element: &Tuple<K, V>) -> CursorResult<()> {
        self.before_key(element.key())
    }

    fn after(&mut self, element: &Tuple<K, V>) -> CursorResult<()> {
        self.after_key(element.key())
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("before_first")?;
        self.browser.before_first()?;
        self.available = false;
        Ok(())
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("after_last")?;
        self.browser.after_last()?;
        self.available = false;
        Ok(())
    }

    fn first(&mut self) -> CursorResult<bool> {
        self.before_first()?;
        self.next()
    }

    fn last(&mut self) -> CursorResult<bool> {
        self.after_last()?;
        self.previous()
    }

    fn next(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("next")?;
        self.available = self.browser.next(&mut self.buffer)?;
        Ok(self.available)
    }

    fn previous(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("previous")?;
        self.available = self.browser.previous(&mut self.buffer)?;
        Ok(self.available)
    }

    fn available(&self) -> bool {
        !self.monitor.is_closed() && self.available
    }

    fn get(&self) -> CursorResult<&Tuple<K, V>> {
        self.monitor.check_not_closed("get")?;
        if !self.available {
            return Err(CursorError::InvalidPosition {
                operation: "get on browser cursor",
            });
        }
        // the flag and the buffer must agree
        self.buffer.as_ref().ok_or_else(|| {
            CursorError::inconsistent("step reported success but no pair was read")
        })
    }

    fn supports_seek(&self) -> bool {
        self.browser.supports_seek()
    }

    fn is_closed(&self) -> bool {
        self.monitor.is_closed()
    }

    fn close(&mut self) -> CursorResult<()> {
        self.monitor.close();
        Ok(())
    }

    fn close_with_cause(&mut self, cause: &str) -> CursorResult<()> {
        self.monitor.close_with_message(cause);
        Ok(())
    }
}
