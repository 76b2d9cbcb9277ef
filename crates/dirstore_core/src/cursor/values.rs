//! Cursor over the duplicate values attached to one key.

use crate::tuple::Tuple;
use dirstore_cursor::{ClosureMonitor, Comparator, Cursor, CursorError, CursorResult};
use std::cmp::Ordering;

/// A cursor enumerating one key's ordered value set as key/value pairs.
///
/// The position is a single bounded integer index into the value array,
/// with the same clamp algebra as a list cursor: `-1` before-first, `len`
/// after-last. The fixed key is paired with each value through a reused
/// `Tuple` buffer.
///
/// `before`/`after` compare only the value half of the supplied tuple and
/// require the value comparator the table sorts duplicates with.
pub struct KeyValuesCursor<K, V> {
    key: K,
    values: Vec<V>,
    pos: isize,
    /// True while parked in the gap just after `pos`, as left by a seek.
    between: bool,
    buffer: Option<Tuple<K, V>>,
    comparator: Option<Comparator<V>>,
    monitor: ClosureMonitor,
}

impl<K: Clone, V: Clone> KeyValuesCursor<K, V> {
    /// Creates a cursor over `values` of `key`, without seek support.
    #[must_use]
    pub fn new(key: K, values: Vec<V>) -> Self {
        Self {
            key,
            values,
            pos: -1,
            between: false,
            buffer: None,
            comparator: None,
            monitor: ClosureMonitor::new(),
        }
    }

    /// Creates a cursor over values sorted by `comparator`, enabling
    /// `before`/`after` positioning.
    #[must_use]
    pub fn sorted(key: K, values: Vec<V>, comparator: Comparator<V>) -> Self {
        let mut cursor = Self::new(key, values);
        cursor.comparator = Some(comparator);
        cursor
    }

    fn len(&self) -> isize {
        self.values.len() as isize
    }

    fn on_element(&self) -> bool {
        !self.between && self.pos >= 0 && self.pos < self.len()
    }

    fn fill(&mut self) {
        let value = self.values[self.pos as usize].clone();
        match &mut self.buffer {
            Some(t) => t.set_value(value),
            None => self.buffer = Some(Tuple::new(self.key.clone(), value)),
        }
    }

    fn park_at_gap(&mut self, insertion: usize) {
        self.between = false;
        if insertion == 0 {
            self.pos = -1;
        } else if insertion as isize == self.len() {
            self.pos = self.len();
        } else {
            self.pos = insertion as isize - 1;
            self.between = true;
        }
    }

    fn seek(&mut self, value: &V, stop_at: Ordering, operation: &'static str) -> CursorResult<()> {
        let comparator = self
            .comparator
            .as_ref()
            .ok_or(CursorError::Unsupported { operation })?
            .clone();
        let insertion = self.values.partition_point(|v| {
            let ordering = comparator(v, value);
            ordering == Ordering::Less || (stop_at == Ordering::Greater && ordering == Ordering::Equal)
        });
        self.park_at_gap(insertion);
        Ok(())
    }
}

impl<K: Clone, V: Clone> Cursor for KeyValuesCursor<K, V> {
    type Item = Tuple<K, V>;

    fn before(&mut self, element: &Tuple<K, V>) -> CursorResult<()> {
        self.monitor.check_not_closed("before")?;
        self.seek(element.value(), Ordering::Equal, "before without comparator")
    }

    fn after(&mut self, element: &Tuple<K, V>) -> CursorResult<()> {
        self.monitor.check_not_closed("after")?;
        self.seek(element.value(), Ordering::Greater, "after without comparator")
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("before_first")?;
        self.between = false;
        self.pos = -1;
        Ok(())
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.monitor.check_not_closed("after_last")?;
        self.between = false;
        self.pos = self.len();
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
        self.between = false;
        if self.pos + 1 < self.len() {
            self.pos += 1;
            self.fill();
            return Ok(true);
        }
        self.pos = self.len();
        Ok(false)
    }

    fn previous(&mut self) -> CursorResult<bool> {
        self.monitor.check_not_closed("previous")?;
        if self.between {
            self.between = false;
            if self.pos >= 0 {
                self.fill();
                return Ok(true);
            }
            self.pos = -1;
            return Ok(false);
        }
        if self.pos >= self.len() {
            if self.values.is_empty() {
                self.pos = -1;
                return Ok(false);
            }
            self.pos = self.len() - 1;
            self.fill();
            return Ok(true);
        }
        if self.pos > 0 {
            self.pos -= 1;
            self.fill();
            return Ok(true);
        }
        self.pos = -1;
        Ok(false)
    }

    fn available(&self) -> bool {
        !self.monitor.is_closed() && self.on_element()
    }

    fn get(&self) -> CursorResult<&Tuple<K, V>> {
        self.monitor.check_not_closed("get")?;
        if !self.on_element() {
            return Err(CursorError::InvalidPosition {
                operation: "get on key-values cursor",
            });
        }
        self.buffer.as_ref().ok_or_else(|| {
            CursorError::inconsistent("position is on an element but no value was read")
        })
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
