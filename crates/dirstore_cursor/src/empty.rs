//! A cursor over nothing.

use crate::cursor::Cursor;
use crate::error::{CursorError, CursorResult};
use crate::monitor::ClosureMonitor;
use std::marker::PhantomData;

/// A cursor over an empty data set.
///
/// Every positioning call succeeds as a no-op, `available` is always false,
/// and `get` always fails with an invalid-position error. Tables return one
/// of these for keys with no values.
#[derive(Debug, Default)]
pub struct EmptyCursor<T> {
    monitor: ClosureMonitor,
    _marker: PhantomData<T>,
}

impl<T> EmptyCursor<T> {
    /// Creates a new empty cursor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            monitor: ClosureMonitor::new(),
            _marker: PhantomData,
        }
    }
}

impl<T> Cursor for EmptyCursor<T> {
    type Item = T;

    fn before(&mut self, _element: &T) -> CursorResult<()> {
        self.monitor.check_not_closed("before")
    }

    fn after(&mut self, _element: &T) -> CursorResult<()> {
        self.monitor.check_not_closed("after")
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("before_first")
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("after_last")
    }

    fn first(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("first")?;
        Ok(false)
    }

    fn last(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("last")?;
        Ok(false)
    }

    fn next(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("next")?;
        Ok(false)
    }

    fn previous(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("previous")?;
        Ok(false)
    }

    fn available(&self) -> bool {
        false
    }

    fn get(&self) -> CursorResult<&T> {
        self.monitor.check_not_closed("get")?;
        Err(CursorError::InvalidPosition {
            operation: "get on empty cursor",
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_never_available() {
        let mut cursor: EmptyCursor<u64> = EmptyCursor::new();
        assert!(!cursor.available());
        assert!(!cursor.first().unwrap());
        assert!(!cursor.last().unwrap());
        assert!(!cursor.next().unwrap());
        assert!(!cursor.previous().unwrap());
        assert!(!cursor.available());
    }

    #[test]
    fn empty_positioning_is_noop() {
        let mut cursor: EmptyCursor<u64> = EmptyCursor::new();
        cursor.before(&5).unwrap();
        cursor.after(&5).unwrap();
        cursor.before_first().unwrap();
        cursor.after_last().unwrap();
    }

    #[test]
    fn empty_get_fails() {
        let cursor: EmptyCursor<u64> = EmptyCursor::new();
        assert!(matches!(
            cursor.get(),
            Err(CursorError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn empty_close_is_idempotent() {
        let mut cursor: EmptyCursor<u64> = EmptyCursor::new();
        cursor.close().unwrap();
        cursor.close().unwrap();
        assert!(cursor.is_closed());
        assert!(matches!(cursor.next(), Err(CursorError::Closed { .. })));
    }
}
