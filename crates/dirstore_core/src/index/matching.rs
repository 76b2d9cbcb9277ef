//! Lazy regex filtering over a forward index scan.

use crate::index::{IndexRecord, IndexValue};
use dirstore_cursor::{Cursor, CursorResult};
use regex::Regex;

/// A cursor yielding only the records whose rendered value matches a
/// pattern.
///
/// Filtering is lazy: each `next`/`previous` advances the underlying scan
/// until the first matching record and stops there, so a caller that reads
/// one match pays for one scan segment. An optional prefix narrows the
/// candidates to values whose rendered form starts with it before the
/// pattern is tried.
pub struct RegexCursor<V> {
    inner: Box<dyn Cursor<Item = IndexRecord<V>>>,
    pattern: Regex,
    prefix: Option<String>,
}

impl<V: IndexValue> RegexCursor<V> {
    /// Wraps `inner`, keeping only records matching `pattern` (and
    /// carrying `prefix`, when given).
    #[must_use]
    pub fn new(
        inner: Box<dyn Cursor<Item = IndexRecord<V>>>,
        pattern: Regex,
        prefix: Option<&str>,
    ) -> Self {
        Self {
            inner,
            pattern,
            prefix: prefix.map(str::to_owned),
        }
    }

    fn matches(&self, record: &IndexRecord<V>) -> bool {
        let text = record.value().to_text();
        if let Some(prefix) = &self.prefix {
            if !text.starts_with(prefix.as_str()) {
                return false;
            }
        }
        self.pattern.is_match(&text)
    }
}

impl<V: IndexValue> Cursor for RegexCursor<V> {
    type Item = IndexRecord<V>;

    fn before(&mut self, element: &IndexRecord<V>) -> CursorResult<()> {
        self.inner.before(element)
    }

    fn after(&mut self, element: &IndexRecord<V>) -> CursorResult<()> {
        self.inner.after(element)
    }

    fn before_first(&mut self) -> CursorResult<()> {
        self.inner.before_first()
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.inner.after_last()
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
        while self.inner.next()? {
            if self.matches(self.inner.get()?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn previous(&mut self) -> CursorResult<bool> {
        while self.inner.previous()? {
            if self.matches(self.inner.get()?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn available(&self) -> bool {
        // the inner cursor only ever rests on matching records
        self.inner.available()
    }

    fn get(&self) -> CursorResult<&IndexRecord<V>> {
        self.inner.get()
    }

    fn supports_seek(&self) -> bool {
        self.inner.supports_seek()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn close(&mut self) -> CursorResult<()> {
        self.inner.close()
    }

    fn close_with_cause(&mut self, cause: &str) -> CursorResult<()> {
        self.inner.close_with_cause(cause)
    }
}
