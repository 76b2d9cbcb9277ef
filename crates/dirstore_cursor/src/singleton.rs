//! A cursor over exactly one element.

use crate::cursor::{Comparator, Cursor};
use crate::error::{CursorError, CursorResult};
use crate::monitor::ClosureMonitor;
use std::cmp::Ordering;

/// Where a singleton cursor sits relative to its one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Before,
    On,
    After,
}

/// A cursor over a single element.
///
/// The cursor toggles between three states: before the element, on it, and
/// after it. `before`/`after` relative to a supplied element use the
/// comparator to decide whether the singleton precedes, equals, or follows
/// it.
pub struct SingletonCursor<T> {
    element: T,
    position: Position,
    comparator: Option<Comparator<T>>,
    monitor: ClosureMonitor,
}

impl<T> SingletonCursor<T> {
    /// Creates a cursor over `element`, without seek support.
    #[must_use]
    pub fn new(element: T) -> Self {
        Self {
            element,
            position: Position::Before,
            comparator: None,
            monitor: ClosureMonitor::new(),
        }
    }

    /// Creates a cursor over `element` that supports `before`/`after`
    /// positioning through `comparator`.
    #[must_use]
    pub fn with_comparator(element: T, comparator: Comparator<T>) -> Self {
        Self {
            element,
            position: Position::Before,
            comparator: Some(comparator),
            monitor: ClosureMonitor::new(),
        }
    }

    fn compare(&self, other: &T, operation: &'static str) -> CursorResult<Ordering> {
        match &self.comparator {
            Some(cmp) => Ok(cmp(&self.element, other)),
            None => Err(CursorError::Unsupported { operation }),
        }
    }
}

impl<T> Cursor for SingletonCursor<T> {
    type Item = T;

    fn before(&mut self, element: &T) -> CursorResult<()> {
        self.monitor.check_not_closed("before")?;
        // next() must land on the singleton iff singleton >= element
        self.position = match self.compare(element, "before without comparator")? {
            Ordering::Greater | Ordering::Equal => Position::Before,
            Ordering::Less => Position::After,
        };
        Ok(())
    }

    fn after(&mut self, element: &T) -> CursorResult<()> {
        self.monitor.check_not_closed("after")?;
        // next() must land on the singleton iff singleton > element
        self.position = match self.compare(element, "after without comparator")? {
            Ordering::Greater => Position::Before,
            Ordering::Equal | Ordering::Less => Position::After,
        };
        Ok(())
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("before_first")?;
        self.position = Position::Before;
        Ok(())
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("after_last")?;
        self.position = Position::After;
        Ok(())
    }

    fn first(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("first")?;
        self.position = Position::On;
        Ok(true)
    }

    fn last(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("last")?;
        self.position = Position::On;
        Ok(true)
    }

    fn next(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("next")?;
        match self.position {
            Position::Before => {
                self.position = Position::On;
                Ok(true)
            }
            Position::On | Position::After => {
                self.position = Position::After;
                Ok(false)
            }
        }
    }

    fn previous(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("previous")?;
        match self.position {
            Position::After => {
                self.position = Position::On;
                Ok(true)
            }
            Position::On | Position::Before => {
                self.position = Position::Before;
                Ok(false)
            }
        }
    }

    fn available(&self) -> bool {
        !self.monitor.is_closed() && self.position == Position::On
    }

    fn get(&self) -> CursorResult<&T> {
        self.monitor.check_not_closed("get")?;
        if self.position == Position::On {
            Ok(&self.element)
        } else {
            Err(CursorError::InvalidPosition {
                operation: "get on singleton cursor",
            })
        }
    }

    fn supports_seek(&self) -> bool {
        self.comparator.is_some()
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
    use crate::cursor::natural;

    #[test]
    fn singleton_toggles_three_states() {
        let mut cursor = SingletonCursor::new(7);
        assert!(!cursor.available());

        assert!(cursor.next().unwrap());
        assert_eq!(*cursor.get().unwrap(), 7);

        assert!(!cursor.next().unwrap());
        assert!(!cursor.available());

        assert!(cursor.previous().unwrap());
        assert_eq!(*cursor.get().unwrap(), 7);

        assert!(!cursor.previous().unwrap());
        assert!(!cursor.available());
    }

    #[test]
    fn singleton_first_and_last() {
        let mut cursor = SingletonCursor::new("only");
        assert!(cursor.first().unwrap());
        assert_eq!(*cursor.get().unwrap(), "only");
        assert!(cursor.last().unwrap());
        assert!(cursor.available());
    }

    #[test]
    fn singleton_before_relative_to_element() {
        let mut cursor = SingletonCursor::with_comparator(10, natural());

        // target below the singleton: next() should yield it
        cursor.before(&5).unwrap();
        assert!(cursor.next().unwrap());
        assert_eq!(*cursor.get().unwrap(), 10);

        // target equal: next() still yields it
        cursor.before(&10).unwrap();
        assert!(cursor.next().unwrap());

        // target above: the singleton is behind us
        cursor.before(&15).unwrap();
        assert!(!cursor.next().unwrap());
        assert!(cursor.previous().unwrap());
        assert_eq!(*cursor.get().unwrap(), 10);
    }

    #[test]
    fn singleton_after_relative_to_element() {
        let mut cursor = SingletonCursor::with_comparator(10, natural());

        cursor.after(&5).unwrap();
        assert!(cursor.next().unwrap());
        assert_eq!(*cursor.get().unwrap(), 10);

        // after(equal) skips the singleton
        cursor.after(&10).unwrap();
        assert!(!cursor.next().unwrap());

        cursor.after(&15).unwrap();
        assert!(!cursor.next().unwrap());
    }

    #[test]
    fn singleton_seek_needs_comparator() {
        let mut cursor = SingletonCursor::new(1);
        assert!(!cursor.supports_seek());
        assert!(matches!(
            cursor.before(&0),
            Err(CursorError::Unsupported { .. })
        ));
        assert!(matches!(
            cursor.after(&0),
            Err(CursorError::Unsupported { .. })
        ));
    }

    #[test]
    fn singleton_close_is_idempotent() {
        let mut cursor = SingletonCursor::new(1);
        cursor.close().unwrap();
        cursor.close_with_cause("ignored, already closed").unwrap();
        assert!(cursor.is_closed());
        assert!(matches!(cursor.get(), Err(CursorError::Closed { .. })));
    }
}
