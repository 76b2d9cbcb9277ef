//! A cursor over a bounded range of an in-memory sequence.

use crate::cursor::{Comparator, Cursor};
use crate::error::{CursorError, CursorResult};
use crate::monitor::ClosureMonitor;
use std::cmp::Ordering;

/// A cursor over the half-open index range `[start, end)` of a sequence.
///
/// The position is tracked as a single integer: `-1` means before-first and
/// `end` means after-last. Stepping clamps at the boundaries and parks the
/// cursor just past them, so a failed `next` leaves `previous` able to
/// return the last element and vice versa.
///
/// `before`/`after` positioning requires a comparator and assumes the
/// backing sequence is sorted by it within `[start, end)`; tables hand out
/// list cursors over sorted snapshots.
pub struct ListCursor<T> {
    list: Vec<T>,
    start: usize,
    end: usize,
    index: isize,
    /// True while parked in the gap just after `index`, as left by a seek.
    between: bool,
    comparator: Option<Comparator<T>>,
    monitor: ClosureMonitor,
}

impl<T> ListCursor<T> {
    /// Creates a cursor over the whole sequence, without seek support.
    pub fn new(list: Vec<T>) -> CursorResult<Self> {
        let end = list.len();
        Self::with_bounds(list, 0, end)
    }

    /// Creates a cursor over `[start, end)` of the sequence.
    ///
    /// # Errors
    ///
    /// Fails with `OutOfBounds` unless `start <= end <= list.len()`, and
    /// unless `start < end` whenever the sequence is non-empty.
    pub fn with_bounds(list: Vec<T>, start: usize, end: usize) -> CursorResult<Self> {
        let len = list.len();
        let range_invalid = start > len || end > len || start > end || (len > 0 && start == end);
        if range_invalid {
            return Err(CursorError::OutOfBounds { start, end, len });
        }
        Ok(Self {
            list,
            start,
            end,
            index: -1,
            between: false,
            comparator: None,
            monitor: ClosureMonitor::new(),
        })
    }

    /// Creates a cursor over a sequence sorted by `comparator`, enabling
    /// `before`/`after` positioning.
    pub fn sorted(list: Vec<T>, comparator: Comparator<T>) -> CursorResult<Self> {
        let mut cursor = Self::new(list)?;
        cursor.comparator = Some(comparator);
        Ok(cursor)
    }

    /// Number of elements in the cursor's range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the cursor's range holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn on_element(&self) -> bool {
        !self.between && self.index >= self.start as isize && self.index < self.end as isize
    }

    /// Parks the cursor so the next `next()` lands on `insertion` and the
    /// next `previous()` lands just below it.
    fn park_at_gap(&mut self, insertion: usize) {
        self.between = false;
        if insertion == self.start {
            self.index = -1;
        } else if insertion == self.end {
            self.index = self.end as isize;
        } else {
            self.index = insertion as isize - 1;
            self.between = true;
        }
    }

    fn seek(
        &mut self,
        element: &T,
        stop_at: Ordering,
        operation: &'static str,
    ) -> CursorResult<()> {
        let comparator = self
            .comparator
            .as_ref()
            .ok_or(CursorError::Unsupported { operation })?
            .clone();
        let mut insertion = self.end;
        for i in self.start..self.end {
            let ordering = comparator(&self.list[i], element);
            if ordering == stop_at || ordering == Ordering::Greater {
                insertion = i;
                break;
            }
        }
        self.park_at_gap(insertion);
        Ok(())
    }
}

impl<T> Cursor for ListCursor<T> {
    type Item = T;

    fn before(&mut self, element: &T) -> CursorResult<()> {
        self.monitor.check_not_closed("before")?;
        // stop at the first element not less than `element`
        self.seek(element, Ordering::Equal, "before without comparator")
    }

    fn after(&mut self, element: &T) -> CursorResult<()> {
        self.monitor.check_not_closed("after")?;
        // stop at the first element strictly greater than `element`
        self.seek(element, Ordering::Greater, "after without comparator")
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("before_first")?;
        self.between = false;
        self.index = -1;
        Ok(())
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("after_last")?;
        self.between = false;
        self.index = self.end as isize;
        Ok(())
    }

    fn first(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("first")?;
        self.between = false;
        if self.is_empty() {
            self.index = -1;
            return Ok(false);
        }
        self.index = self.start as isize;
        Ok(true)
    }

    fn last(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("last")?;
        self.between = false;
        if self.is_empty() {
            self.index = self.end as isize;
            return Ok(false);
        }
        self.index = self.end as isize - 1;
        Ok(true)
    }

    fn next(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("next")?;
        self.between = false;
        if self.index < 0 {
            self.index = self.start as isize;
            return Ok(!self.is_empty());
        }
        if (self.index as usize) + 1 < self.end {
            self.index += 1;
            return Ok(true);
        }
        self.index = self.end as isize;
        Ok(false)
    }

    fn previous(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("previous")?;
        if self.between {
            // the element just below the gap is at `index`
            self.between = false;
            if self.index >= self.start as isize {
                return Ok(true);
            }
            self.index = -1;
            return Ok(false);
        }
        if self.index >= self.end as isize {
            if self.is_empty() {
                self.index = -1;
                return Ok(false);
            }
            self.index = self.end as isize - 1;
            return Ok(true);
        }
        if self.index > self.start as isize {
            self.index -= 1;
            return Ok(true);
        }
        self.index = -1;
        Ok(false)
    }

    fn available(&self) -> bool {
        !self.monitor.is_closed() && self.on_element()
    }

    fn get(&self) -> CursorResult<&T> {
        self.monitor.check_not_closed("get")?;
        if self.on_element() {
            Ok(&self.list[self.index as usize])
        } else {
            Err(CursorError::InvalidPosition {
                operation: "get on list cursor",
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
